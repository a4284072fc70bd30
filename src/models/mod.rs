pub mod one_compartment;

use crate::error::{PKError, PKResult};
use serde::{Deserialize, Serialize};

pub use one_compartment::OneCompartmentModel;

/// Below this separation `ka` and `ke` are treated as equal.
pub const RATE_EPSILON: f64 = 1e-9;

/// Added to `ka` when the rates collide. This is a numerical fallback that
/// keeps the closed-form solution finite; it approximates, and does not model,
/// the `ka == ke` case.
pub const RATE_PERTURBATION: f64 = 1e-6;

pub trait PKModel {
    /// Concentration at `time_since_dose` hours. Negative times are pre-dose.
    fn concentration(&self, time_since_dose: f64) -> f64;

    /// Hours from dose to peak concentration.
    fn time_to_peak(&self) -> f64;

    fn curve(&self, time_since_dose: &[f64]) -> Vec<f64> {
        time_since_dose
            .iter()
            .map(|&t| self.concentration(t))
            .collect()
    }
}

/// First-order absorption and elimination rate constants, per hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticParams {
    pub ka: f64,
    pub ke: f64,
}

impl KineticParams {
    pub fn new(ka: f64, ke: f64) -> PKResult<Self> {
        let params = Self { ka, ke };
        params.validate()?;
        Ok(params)
    }

    pub fn from_half_life(ka: f64, half_life_hours: f64) -> PKResult<Self> {
        if !(half_life_hours.is_finite() && half_life_hours > 0.0) {
            return Err(PKError::InvalidParameters(format!(
                "half-life must be positive, got {}",
                half_life_hours
            )));
        }
        Self::new(ka, std::f64::consts::LN_2 / half_life_hours)
    }

    pub fn validate(&self) -> PKResult<()> {
        if !(self.ka.is_finite() && self.ka > 0.0) {
            return Err(PKError::InvalidParameters(format!(
                "ka must be positive, got {}",
                self.ka
            )));
        }
        if !(self.ke.is_finite() && self.ke > 0.0) {
            return Err(PKError::InvalidParameters(format!(
                "ke must be positive, got {}",
                self.ke
            )));
        }
        Ok(())
    }

    pub fn half_life(&self) -> f64 {
        std::f64::consts::LN_2 / self.ke
    }

    pub fn is_degenerate(&self) -> bool {
        (self.ka - self.ke).abs() < RATE_EPSILON
    }

    /// `ka` as used in the closed-form solution, nudged apart from `ke` when
    /// the two collide.
    pub fn effective_ka(&self) -> f64 {
        if self.is_degenerate() {
            self.ka + RATE_PERTURBATION
        } else {
            self.ka
        }
    }

    /// Analytic t_max of the one-compartment oral model, `ln(ka/ke) / (ka - ke)`.
    pub fn time_to_peak(&self) -> f64 {
        let ka = self.effective_ka();
        (ka / self.ke).ln() / (ka - self.ke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_non_positive_rates() {
        assert!(KineticParams::new(0.0, 0.1).is_err());
        assert!(KineticParams::new(1.0, -0.1).is_err());
        assert!(KineticParams::new(f64::NAN, 0.1).is_err());
        assert!(KineticParams::from_half_life(1.0, 0.0).is_err());
    }

    #[test]
    fn test_half_life_round_trip() {
        let params = KineticParams::from_half_life(1.1, 10.0).unwrap();
        assert_relative_eq!(params.ke, std::f64::consts::LN_2 / 10.0, epsilon = 1e-12);
        assert_relative_eq!(params.half_life(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_time_to_peak_formula() {
        let params = KineticParams::new(1.1, std::f64::consts::LN_2 / 10.0).unwrap();
        let expected = (1.1 / params.ke).ln() / (1.1 - params.ke);
        assert_relative_eq!(params.time_to_peak(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_rates_are_perturbed() {
        let params = KineticParams::new(0.5, 0.5).unwrap();
        assert!(params.is_degenerate());
        assert_relative_eq!(params.effective_ka(), 0.5 + RATE_PERTURBATION);
        // Limit of ln(ka/ke)/(ka-ke) as ka -> ke is 1/ke.
        assert_relative_eq!(params.time_to_peak(), 2.0, epsilon = 1e-4);
    }
}
