use crate::error::{PKError, PKResult};
use crate::models::KineticParams;
use crate::simulation::SideEffectSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kinetic profile of a drug as stored in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugProfile {
    pub ka: f64,
    pub ke: f64,
    #[serde(default = "unit_dose")]
    pub dose: f64,
    #[serde(default)]
    pub t_max_hours: Option<f64>,
}

fn unit_dose() -> f64 {
    1.0
}

impl DrugProfile {
    pub fn params(&self) -> PKResult<KineticParams> {
        KineticParams::new(self.ka, self.ke)
    }

    fn validate(&self, name: &str) -> PKResult<()> {
        self.params()
            .map_err(|e| PKError::InvalidConfig(format!("drug '{}': {}", name, e)))?;
        if !(self.dose.is_finite() && self.dose > 0.0) {
            return Err(PKError::InvalidConfig(format!(
                "drug '{}': dose must be positive",
                name
            )));
        }
        if let Some(t_max) = self.t_max_hours {
            if !(t_max.is_finite() && t_max > 0.0) {
                return Err(PKError::InvalidConfig(format!(
                    "drug '{}': t_max_hours must be positive",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Immutable lookup tables handed to the engine's callers. Keys are stored
/// lowercase so lookups ignore case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    pub drugs: BTreeMap<String, DrugProfile>,
    pub side_effects: BTreeMap<String, SideEffectSpec>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut drugs = BTreeMap::new();
        let mut side_effects = BTreeMap::new();

        // Built-in profiles: (name, ka, half-life h, tabulated t_max h)
        let builtin: [(&str, f64, f64, Option<f64>); 4] = [
            ("amphetamine ir", 1.1, 10.0, Some(3.0)),
            ("amphetamine xr", 0.45, 11.0, Some(7.0)),
            ("clonazepam", 1.8, 35.0, Some(2.0)),
            ("alprazolam", 2.0, 11.0, Some(1.5)),
        ];
        for (name, ka, half_life, t_max) in builtin {
            if let Ok(params) = KineticParams::from_half_life(ka, half_life) {
                drugs.insert(
                    name.to_string(),
                    DrugProfile {
                        ka: params.ka,
                        ke: params.ke,
                        dose: unit_dose(),
                        t_max_hours: t_max,
                    },
                );
            }
        }

        side_effects.insert(
            "crash".to_string(),
            SideEffectSpec::Rebound {
                decline_threshold: 0.7,
            },
        );
        side_effects.insert(
            "rebound anxiety".to_string(),
            SideEffectSpec::Rebound {
                decline_threshold: 0.5,
            },
        );
        side_effects.insert(
            "insomnia".to_string(),
            SideEffectSpec::Trailing { lag_hours: 1.5 },
        );
        side_effects.insert(
            "appetite suppression".to_string(),
            SideEffectSpec::Trailing { lag_hours: 0.5 },
        );
        side_effects.insert("fatigue".to_string(), SideEffectSpec::Cumulative);

        Self {
            drugs,
            side_effects,
        }
    }
}

impl Registry {
    pub fn drug(&self, name: &str) -> PKResult<&DrugProfile> {
        self.drugs
            .get(&normalize_key(name))
            .ok_or_else(|| PKError::UnknownDrug(name.to_string()))
    }

    pub fn side_effect(&self, name: &str) -> PKResult<&SideEffectSpec> {
        self.side_effects
            .get(&normalize_key(name))
            .ok_or_else(|| PKError::UnknownSideEffect(name.to_string()))
    }

    /// Lowercases keys loaded from a config file so lookups stay case-blind.
    pub fn normalized(self) -> Self {
        Self {
            drugs: self
                .drugs
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect(),
            side_effects: self
                .side_effects
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect(),
        }
    }

    pub fn validate(&self) -> PKResult<()> {
        for (name, profile) in &self.drugs {
            profile.validate(name)?;
        }
        for (name, spec) in &self.side_effects {
            spec.validate()
                .map_err(|e| PKError::InvalidConfig(format!("side effect '{}': {}", name, e)))?;
        }
        Ok(())
    }
}

fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}
