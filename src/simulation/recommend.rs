use super::curve::{argmax, peak};
use super::grid::{hours_between, offset, TimeGrid};
use crate::config::RecommenderConfig;
use crate::dosing::CounterDose;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which side-effect landmark the counter-dose peak is lined up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommenderPolicy {
    /// Counter drug peaks as the side effect starts.
    #[default]
    AlignOnset,
    /// Counter drug peaks with the side effect.
    AlignPeak,
}

impl RecommenderPolicy {
    pub fn anchor_hours(&self, onset_hours: f64, peak_hours: f64) -> f64 {
        match self {
            RecommenderPolicy::AlignOnset => onset_hours,
            RecommenderPolicy::AlignPeak => peak_hours,
        }
    }
}

/// Landmarks of the side-effect curve and the suggested counter-dose time.
///
/// Hour fields are measured from the primary dose.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub policy: RecommenderPolicy,
    pub onset_hours: f64,
    pub onset_time: NaiveDateTime,
    pub peak_hours: f64,
    pub peak_time: NaiveDateTime,
    pub counter_t_max_hours: Option<f64>,
    pub optimal_offset_hours: Option<f64>,
    pub optimal_counter_time: Option<NaiveDateTime>,
    pub coverage_percent: f64,
}

/// First sample above `fraction` of the curve's peak.
pub fn onset_index(curve: &[f64], fraction: f64) -> Option<usize> {
    let level = fraction * peak(curve);
    if level <= 0.0 {
        return None;
    }
    curve.iter().position(|&v| v > level)
}

/// Sample holding the curve's maximum; `None` for an all-zero curve.
pub fn peak_index(curve: &[f64]) -> Option<usize> {
    if peak(curve) <= 0.0 {
        return None;
    }
    argmax(curve)
}

/// Hours after the primary dose at which the counter dose should be taken,
/// never before the primary dose itself.
pub fn optimal_offset(
    policy: RecommenderPolicy,
    onset_hours: f64,
    peak_hours: f64,
    t_max: f64,
) -> f64 {
    (policy.anchor_hours(onset_hours, peak_hours) - t_max).max(0.0)
}

pub fn recommend(
    grid: &TimeGrid,
    side_effect: &[f64],
    primary_dose_time: NaiveDateTime,
    counter: Option<&CounterDose>,
    config: &RecommenderConfig,
    coverage_percent: f64,
) -> Recommendation {
    let hours_from_dose = |index: Option<usize>| {
        index
            .map(|i| hours_between(grid.timestamp_at(i), primary_dose_time))
            .unwrap_or(0.0)
    };

    let onset_hours = hours_from_dose(onset_index(side_effect, config.onset_fraction));
    let peak_hours = hours_from_dose(peak_index(side_effect));

    let counter_t_max_hours = counter.map(CounterDose::time_to_peak);
    let optimal_offset_hours = counter_t_max_hours
        .map(|t_max| optimal_offset(config.policy, onset_hours, peak_hours, t_max));

    Recommendation {
        policy: config.policy,
        onset_hours,
        onset_time: offset(primary_dose_time, onset_hours),
        peak_hours,
        peak_time: offset(primary_dose_time, peak_hours),
        counter_t_max_hours,
        optimal_offset_hours,
        optimal_counter_time: optimal_offset_hours.map(|h| offset(primary_dose_time, h)),
        coverage_percent,
    }
}
