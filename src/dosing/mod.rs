use crate::error::{PKError, PKResult};
use crate::models::{KineticParams, OneCompartmentModel, PKModel};
use chrono::NaiveDateTime;

/// Month/day formats accepted on the command line. The year is appended
/// before parsing since users rarely type it.
const DOSE_TIME_FORMATS: &[&str] = &["%m/%d %I:%M%p %Y", "%m/%d %H:%M %Y"];

const ISO_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A single administration of one drug.
#[derive(Debug, Clone)]
pub struct DoseEvent {
    pub drug: String,
    pub time: NaiveDateTime,
    model: OneCompartmentModel,
}

impl DoseEvent {
    pub fn new(
        drug: impl Into<String>,
        params: KineticParams,
        dose: f64,
        time: NaiveDateTime,
    ) -> PKResult<Self> {
        let model = OneCompartmentModel::new(params, dose)?;
        Ok(Self {
            drug: drug.into(),
            time,
            model,
        })
    }

    pub fn model(&self) -> &OneCompartmentModel {
        &self.model
    }

    pub fn params(&self) -> KineticParams {
        self.model.params()
    }

    pub fn dose(&self) -> f64 {
        self.model.dose()
    }
}

/// Counter-medication dose plus its characteristic time to peak.
#[derive(Debug, Clone)]
pub struct CounterDose {
    pub event: DoseEvent,
    /// Tabulated t_max. When absent the analytic one-compartment value is used.
    pub t_max_hours: Option<f64>,
}

impl CounterDose {
    pub fn new(event: DoseEvent, t_max_hours: Option<f64>) -> PKResult<Self> {
        if let Some(t_max) = t_max_hours {
            if !(t_max.is_finite() && t_max > 0.0) {
                return Err(PKError::InvalidParameters(format!(
                    "t_max must be positive, got {}",
                    t_max
                )));
            }
        }
        Ok(Self { event, t_max_hours })
    }

    pub fn time_to_peak(&self) -> f64 {
        self.t_max_hours
            .unwrap_or_else(|| self.event.model().time_to_peak())
    }
}

/// Parses dose times such as `12/24 8am`, `12/24 10:30pm`, `12/24 22:00`
/// or `2025-12-24 22:00`. Month/day forms are placed in `year`.
pub fn parse_dose_time(text: &str, year: i32) -> PKResult<NaiveDateTime> {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return Err(PKError::TimeParse(text.to_string()));
    }

    if let Ok(time) = NaiveDateTime::parse_from_str(&cleaned, ISO_FORMAT) {
        return Ok(time);
    }

    let with_year = format!("{} {}", expand_bare_hour(&cleaned.to_uppercase()), year);
    DOSE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&with_year, fmt).ok())
        .ok_or_else(|| PKError::TimeParse(text.to_string()))
}

/// `8AM` -> `8:00AM`; chrono needs the minutes field to build a time.
fn expand_bare_hour(text: &str) -> String {
    match text.rsplit_once(' ') {
        Some((date, time)) if !time.contains(':') => {
            let split = time
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(time.len());
            let (hour, suffix) = time.split_at(split);
            format!("{} {}:00{}", date, hour, suffix)
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_bare_hour() {
        assert_eq!(parse_dose_time("12/24 8am", 2025).unwrap(), at(12, 24, 8, 0));
        assert_eq!(parse_dose_time("12/24 10PM", 2025).unwrap(), at(12, 24, 22, 0));
        assert_eq!(parse_dose_time("  12/24   2pm ", 2025).unwrap(), at(12, 24, 14, 0));
    }

    #[test]
    fn test_parse_hour_minute() {
        assert_eq!(parse_dose_time("12/24 10:30pm", 2025).unwrap(), at(12, 24, 22, 30));
        assert_eq!(parse_dose_time("01/02 22:15", 2025).unwrap(), at(1, 2, 22, 15));
        assert_eq!(parse_dose_time("01/02 7:05", 2025).unwrap(), at(1, 2, 7, 5));
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_dose_time("2025-03-01 06:45", 1999).unwrap(), at(3, 1, 6, 45));
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(parse_dose_time("", 2025), Err(PKError::TimeParse(_))));
        assert!(parse_dose_time("tomorrow morning", 2025).is_err());
        assert!(parse_dose_time("13/40 8am", 2025).is_err());
    }

    #[test]
    fn test_dose_event_validation() {
        let time = at(12, 24, 8, 0);
        let bad = KineticParams { ka: 1.0, ke: -0.1 };
        assert!(DoseEvent::new("x", bad, 1.0, time).is_err());

        let good = KineticParams::new(1.0, 0.1).unwrap();
        assert!(DoseEvent::new("x", good, 0.0, time).is_err());
        let event = DoseEvent::new("x", good, 2.0, time).unwrap();
        assert_eq!(event.dose(), 2.0);
    }

    #[test]
    fn test_counter_time_to_peak() {
        let time = at(12, 24, 14, 0);
        let params = KineticParams::from_half_life(1.8, 35.0).unwrap();
        let event = DoseEvent::new("counter", params, 1.0, time).unwrap();

        let tabulated = CounterDose::new(event.clone(), Some(2.0)).unwrap();
        assert_eq!(tabulated.time_to_peak(), 2.0);

        let analytic = CounterDose::new(event.clone(), None).unwrap();
        assert!((analytic.time_to_peak() - params.time_to_peak()).abs() < 1e-12);

        assert!(CounterDose::new(event, Some(0.0)).is_err());
    }
}
