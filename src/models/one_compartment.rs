use super::{KineticParams, PKModel};
use crate::error::{PKError, PKResult};

/// One-compartment model with first-order absorption and elimination.
#[derive(Debug, Clone)]
pub struct OneCompartmentModel {
    params: KineticParams,
    dose: f64,
}

impl OneCompartmentModel {
    pub fn new(params: KineticParams, dose: f64) -> PKResult<Self> {
        params.validate()?;
        if !(dose.is_finite() && dose > 0.0) {
            return Err(PKError::InvalidParameters(format!(
                "dose must be positive, got {}",
                dose
            )));
        }
        Ok(Self { params, dose })
    }

    pub fn params(&self) -> KineticParams {
        self.params
    }

    pub fn dose(&self) -> f64 {
        self.dose
    }
}

impl PKModel for OneCompartmentModel {
    fn concentration(&self, time_since_dose: f64) -> f64 {
        // Pre-dose samples clamp to t = 0, where the solution is exactly zero.
        let t = time_since_dose.max(0.0);
        let ka = self.params.effective_ka();
        let ke = self.params.ke;

        let conc = self.dose * ka / (ka - ke) * ((-ke * t).exp() - (-ka * t).exp());
        conc.max(0.0)
    }

    fn time_to_peak(&self) -> f64 {
        self.params.time_to_peak()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stimulant() -> OneCompartmentModel {
        let params = KineticParams::new(1.1, std::f64::consts::LN_2 / 10.0).unwrap();
        OneCompartmentModel::new(params, 100.0).unwrap()
    }

    #[test]
    fn test_zero_at_dose_time() {
        let model = stimulant();
        assert_eq!(model.concentration(0.0), 0.0);
    }

    #[test]
    fn test_pre_dose_is_zero() {
        let model = stimulant();
        assert_eq!(model.concentration(-3.0), 0.0);
        assert_eq!(model.concentration(-0.001), 0.0);
    }

    #[test]
    fn test_oral_concentration() {
        let model = stimulant();
        let ka: f64 = 1.1;
        let ke = std::f64::consts::LN_2 / 10.0;
        let expected = 100.0 * ka / (ka - ke) * ((-ke * 1.0).exp() - (-ka * 1.0).exp());
        assert_relative_eq!(model.concentration(1.0), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_non_negative_and_decays() {
        let model = stimulant();
        for i in 0..2000 {
            let t = i as f64 * 0.25;
            assert!(model.concentration(t) >= 0.0);
        }
        assert!(model.concentration(500.0) < 1e-9);
    }

    #[test]
    fn test_absorption_slower_than_elimination() {
        // Flip-flop kinetics still give a non-negative, peaked curve.
        let params = KineticParams::new(0.1, 0.5).unwrap();
        let model = OneCompartmentModel::new(params, 10.0).unwrap();
        let tmax = model.time_to_peak();
        assert!(tmax > 0.0);
        assert!(model.concentration(tmax) > model.concentration(tmax * 0.5));
        assert!(model.concentration(tmax) > model.concentration(tmax * 2.0));
    }

    #[test]
    fn test_degenerate_rates_stay_finite() {
        let params = KineticParams::new(0.3, 0.3).unwrap();
        let model = OneCompartmentModel::new(params, 1.0).unwrap();
        let t: f64 = 2.0;
        // ka == ke limit: dose * k * t * exp(-k t)
        let limit = 0.3 * t * (-0.3 * t).exp();
        let conc = model.concentration(t);
        assert!(conc.is_finite());
        assert_relative_eq!(conc, limit, epsilon = 1e-3);
    }

    #[test]
    fn test_rejects_bad_dose() {
        let params = KineticParams::new(1.0, 0.1).unwrap();
        assert!(OneCompartmentModel::new(params, 0.0).is_err());
        assert!(OneCompartmentModel::new(params, -5.0).is_err());
    }
}
