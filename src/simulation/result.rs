use super::curve::{argmax, integrate, peak, IntegrationRule};
use super::{Recommendation, SideEffectSpec, TimeGrid};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Every series and metric produced by one engine pass.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionResult {
    pub grid: TimeGrid,
    pub primary_drug: String,
    pub counter_drug: Option<String>,
    pub side_effect: SideEffectSpec,
    pub primary_curve: Vec<f64>,
    pub side_effect_curve: Vec<f64>,
    pub counter_curve: Vec<f64>,
    pub mitigation_curve: Vec<f64>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurveSummary {
    pub peak: f64,
    /// Hours from grid start (not from the dose) to the peak, `None` for an
    /// all-zero curve.
    pub peak_grid_hour: Option<f64>,
    pub auc: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionSummary {
    pub grid_start: NaiveDateTime,
    pub window_hours: f64,
    pub sample_count: usize,
    pub primary_drug: String,
    pub counter_drug: Option<String>,
    pub side_effect: SideEffectSpec,
    pub primary: CurveSummary,
    pub side_effect_curve: CurveSummary,
    pub counter: CurveSummary,
    pub mitigation: CurveSummary,
    pub recommendation: Recommendation,
}

impl InteractionResult {
    pub fn curve_summary(&self, curve: &[f64]) -> CurveSummary {
        let max = peak(curve);
        let peak_grid_hour = if max > 0.0 {
            argmax(curve).map(|i| self.grid.hours()[i])
        } else {
            None
        };
        CurveSummary {
            peak: max,
            peak_grid_hour,
            auc: integrate(curve, self.grid.step(), IntegrationRule::Trapezoid),
        }
    }

    pub fn summary(&self) -> InteractionSummary {
        InteractionSummary {
            grid_start: self.grid.start(),
            window_hours: self.grid.window_hours(),
            sample_count: self.grid.len(),
            primary_drug: self.primary_drug.clone(),
            counter_drug: self.counter_drug.clone(),
            side_effect: self.side_effect.clone(),
            primary: self.curve_summary(&self.primary_curve),
            side_effect_curve: self.curve_summary(&self.side_effect_curve),
            counter: self.curve_summary(&self.counter_curve),
            mitigation: self.curve_summary(&self.mitigation_curve),
            recommendation: self.recommendation.clone(),
        }
    }
}
