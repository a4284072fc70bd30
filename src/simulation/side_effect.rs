use super::curve::{cumulative_integral, gradient, normalize, peak};
use crate::error::{PKError, PKResult};
use crate::models::PKModel;
use serde::{Deserialize, Serialize};

/// How a symptom-intensity curve is derived from the primary drug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum SideEffectSpec {
    /// Tracks plasma concentration with a fixed onset delay.
    Trailing { lag_hours: f64 },
    /// Driven by the speed of decline once the normalized primary curve has
    /// fallen below `decline_threshold` of its peak.
    Rebound { decline_threshold: f64 },
    /// Accumulated exposure.
    Cumulative,
}

impl SideEffectSpec {
    pub fn validate(&self) -> PKResult<()> {
        match *self {
            SideEffectSpec::Trailing { lag_hours } => {
                if !(lag_hours.is_finite() && lag_hours >= 0.0) {
                    return Err(PKError::InvalidParameters(format!(
                        "lag_hours must not be negative, got {}",
                        lag_hours
                    )));
                }
            }
            SideEffectSpec::Rebound { decline_threshold } => {
                if !(decline_threshold > 0.0 && decline_threshold < 1.0) {
                    return Err(PKError::InvalidParameters(format!(
                        "decline_threshold must be in (0, 1), got {}",
                        decline_threshold
                    )));
                }
            }
            SideEffectSpec::Cumulative => {}
        }
        Ok(())
    }

    pub fn category(&self) -> &'static str {
        match self {
            SideEffectSpec::Trailing { .. } => "trailing",
            SideEffectSpec::Rebound { .. } => "rebound",
            SideEffectSpec::Cumulative => "cumulative",
        }
    }

    /// Intensity before normalization.
    ///
    /// `model` and `time_since_dose` describe the primary drug;
    /// `primary_normalized` is its curve after normalization on the same grid.
    pub fn derive_raw<M: PKModel>(
        &self,
        model: &M,
        time_since_dose: &[f64],
        primary_normalized: &[f64],
        step: f64,
    ) -> Vec<f64> {
        match *self {
            SideEffectSpec::Trailing { lag_hours } => {
                let lagged: Vec<f64> = time_since_dose.iter().map(|t| t - lag_hours).collect();
                model.curve(&lagged)
            }
            SideEffectSpec::Rebound { decline_threshold } => {
                rebound_intensity(primary_normalized, step, decline_threshold)
            }
            SideEffectSpec::Cumulative => cumulative_integral(primary_normalized, step),
        }
    }

    pub fn derive<M: PKModel>(
        &self,
        model: &M,
        time_since_dose: &[f64],
        primary_normalized: &[f64],
        step: f64,
        ceiling: f64,
    ) -> Vec<f64> {
        let raw = self.derive_raw(model, time_since_dose, primary_normalized, step);
        normalize(&raw, ceiling)
    }
}

/// `|dC/dt|` wherever the curve is falling and below `threshold` of its peak,
/// zero elsewhere.
fn rebound_intensity(primary: &[f64], step: f64, threshold: f64) -> Vec<f64> {
    let level = threshold * peak(primary);
    gradient(primary, step)
        .into_iter()
        .zip(primary)
        .map(|(slope, &value)| {
            if slope < 0.0 && value < level {
                slope.abs()
            } else {
                0.0
            }
        })
        .collect()
}
