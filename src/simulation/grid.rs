use crate::config::GridConfig;
use crate::error::{PKError, PKResult};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Evenly spaced hour offsets from an absolute start instant.
#[derive(Debug, Clone, Serialize)]
pub struct TimeGrid {
    start: NaiveDateTime,
    hours: Vec<f64>,
    step: f64,
}

impl TimeGrid {
    /// Grid whose zero sits `lead_in_hours` before the earliest dose.
    pub fn anchored(dose_times: &[NaiveDateTime], config: &GridConfig) -> PKResult<Self> {
        let earliest = dose_times
            .iter()
            .min()
            .ok_or_else(|| PKError::MissingInput("at least one dose time".to_string()))?;
        let start = offset(*earliest, -config.lead_in_hours);
        Ok(Self::new(start, config.window_hours, config.sample_count))
    }

    /// `sample_count` points from 0 to `window_hours`, both ends included.
    pub fn new(start: NaiveDateTime, window_hours: f64, sample_count: usize) -> Self {
        let intervals = sample_count.saturating_sub(1).max(1) as f64;
        let step = window_hours / intervals;
        let hours = (0..sample_count).map(|i| i as f64 * step).collect();
        Self { start, hours, step }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn hours(&self) -> &[f64] {
        &self.hours
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn window_hours(&self) -> f64 {
        self.hours.last().copied().unwrap_or(0.0)
    }

    /// Hours elapsed since `dose_time` at every sample; negative before the dose.
    pub fn time_since(&self, dose_time: NaiveDateTime) -> Vec<f64> {
        let lead = hours_between(self.start, dose_time);
        self.hours.iter().map(|h| lead + h).collect()
    }

    pub fn timestamp_at(&self, index: usize) -> NaiveDateTime {
        offset(self.start, self.hours.get(index).copied().unwrap_or(0.0))
    }
}

/// Fractional hours from `earlier` to `later`.
pub fn hours_between(later: NaiveDateTime, earlier: NaiveDateTime) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// `time` shifted by a fractional number of hours, to millisecond precision.
pub fn offset(time: NaiveDateTime, hours: f64) -> NaiveDateTime {
    time + Duration::milliseconds((hours * MILLIS_PER_HOUR).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 24)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_grid_is_strictly_increasing() {
        let grid = TimeGrid::new(at(6, 0), 36.0, 1000);
        assert_eq!(grid.len(), 1000);
        assert_relative_eq!(grid.step(), 36.0 / 999.0);
        assert_eq!(grid.hours()[0], 0.0);
        assert_relative_eq!(grid.window_hours(), 36.0, epsilon = 1e-9);
        assert!(grid.hours().windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_anchored_to_earliest_dose() {
        let config = GridConfig::default();
        let grid = TimeGrid::anchored(&[at(14, 0), at(8, 0)], &config).unwrap();
        assert_eq!(grid.start(), at(6, 0));
    }

    #[test]
    fn test_anchored_requires_a_dose() {
        let config = GridConfig::default();
        assert!(matches!(
            TimeGrid::anchored(&[], &config),
            Err(PKError::MissingInput(_))
        ));
    }

    #[test]
    fn test_time_since_dose() {
        let grid = TimeGrid::new(at(6, 0), 36.0, 37);
        let since_primary = grid.time_since(at(8, 0));
        let since_counter = grid.time_since(at(14, 30));

        assert_relative_eq!(since_primary[0], -2.0);
        assert_relative_eq!(since_primary[2], 0.0);
        assert_relative_eq!(since_primary[36], 34.0);
        assert_relative_eq!(since_counter[0], -8.5);
        assert_relative_eq!(since_counter[10], 1.5);
    }

    #[test]
    fn test_timestamp_at() {
        let grid = TimeGrid::new(at(6, 0), 36.0, 73);
        assert_eq!(grid.timestamp_at(0), at(6, 0));
        assert_eq!(grid.timestamp_at(3), at(7, 30));
    }

    #[test]
    fn test_offset_round_trip() {
        let shifted = offset(at(8, 0), 2.75);
        assert_eq!(shifted, at(10, 45));
        assert_relative_eq!(hours_between(shifted, at(8, 0)), 2.75);
    }
}
