pub mod registry;

use crate::error::{PKError, PKResult};
use crate::simulation::{IntegrationRule, RecommenderPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use registry::Registry;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub curves: CurveConfig,
    pub recommender: RecommenderConfig,
    pub registry: Registry,
}

/// Sampling axis shared by every curve in one computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub window_hours: f64,
    pub sample_count: usize,
    pub lead_in_hours: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            window_hours: 36.0,
            sample_count: 1000,
            lead_in_hours: 2.0,
        }
    }
}

/// Peak amplitudes each curve is normalized to. Side effects sit below the
/// primary line so both stay readable on one plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub primary_ceiling: f64,
    pub side_effect_ceiling: f64,
    pub counter_ceiling: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            primary_ceiling: 100.0,
            side_effect_ceiling: 85.0,
            counter_ceiling: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Fraction of the side-effect peak that marks onset.
    pub onset_fraction: f64,
    pub policy: RecommenderPolicy,
    pub integration: IntegrationRule,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            onset_fraction: 0.05,
            policy: RecommenderPolicy::AlignOnset,
            integration: IntegrationRule::Trapezoid,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> PKResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.registry = config.registry.normalized();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PKResult<()> {
        self.validate_grid()?;
        self.validate_curves()?;

        let onset = self.recommender.onset_fraction;
        if !(onset > 0.0 && onset < 1.0) {
            return Err(PKError::InvalidConfig(format!(
                "onset_fraction must be in (0, 1), got {}",
                onset
            )));
        }

        self.registry.validate()?;

        Ok(())
    }

    fn validate_grid(&self) -> PKResult<()> {
        let grid = &self.grid;
        if !(grid.window_hours.is_finite() && grid.window_hours > 0.0) {
            return Err(PKError::InvalidConfig(
                "window_hours must be positive".to_string(),
            ));
        }
        if grid.sample_count < 2 {
            return Err(PKError::InvalidConfig(
                "sample_count must be at least 2".to_string(),
            ));
        }
        if !(grid.lead_in_hours.is_finite() && grid.lead_in_hours >= 0.0) {
            return Err(PKError::InvalidConfig(
                "lead_in_hours must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_curves(&self) -> PKResult<()> {
        let ceilings = [
            ("primary_ceiling", self.curves.primary_ceiling),
            ("side_effect_ceiling", self.curves.side_effect_ceiling),
            ("counter_ceiling", self.curves.counter_ceiling),
        ];
        for (name, value) in ceilings {
            if !(value.is_finite() && value > 0.0) {
                return Err(PKError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "grid": { "window_hours": 48.0 },
            "recommender": { "policy": "align_peak", "integration": "sum" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        config.validate().unwrap();

        assert_eq!(config.grid.window_hours, 48.0);
        assert_eq!(config.grid.sample_count, 1000);
        assert_eq!(config.curves.side_effect_ceiling, 85.0);
        assert_eq!(config.recommender.policy, RecommenderPolicy::AlignPeak);
        assert_eq!(config.recommender.integration, IntegrationRule::Sum);
        assert!(config.registry.drug("clonazepam").is_ok());
    }

    #[test]
    fn test_invalid_grid() {
        let mut config = Config::default();
        config.grid.sample_count = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.grid.window_hours = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.grid.lead_in_hours = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_recommender() {
        let mut config = Config::default();
        config.recommender.onset_fraction = 1.5;
        assert!(matches!(config.validate(), Err(PKError::InvalidConfig(_))));

        let mut config = Config::default();
        config.curves.side_effect_ceiling = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_normalizes_registry() {
        let path = std::env::temp_dir().join(format!(
            "pk_overlap_config_{}.json",
            std::process::id()
        ));
        let json = r#"{
            "registry": {
                "drugs": { "Methylphenidate": { "ka": 1.4, "ke": 0.25, "t_max_hours": 2.0 } },
                "side_effects": { "Irritability": { "category": "rebound", "decline_threshold": 0.6 } }
            }
        }"#;
        std::fs::File::create(&path)
            .unwrap()
            .write_all(json.as_bytes())
            .unwrap();

        let config = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let drug = config.registry.drug("methylphenidate").unwrap();
        assert_eq!(drug.dose, 1.0);
        assert!(config.registry.side_effect("IRRITABILITY").is_ok());
        assert!(config.registry.drug("clonazepam").is_err());
    }
}
