pub mod curve;
pub mod grid;
pub mod overlap;
pub mod recommend;
pub mod result;
pub mod side_effect;

use crate::config::Config;
use crate::dosing::{CounterDose, DoseEvent};
use crate::error::PKResult;
use crate::models::PKModel;
use log::{debug, info, warn};

pub use curve::*;
pub use grid::*;
pub use overlap::*;
pub use recommend::*;
pub use result::*;
pub use side_effect::*;

/// Inputs for one engine pass.
#[derive(Debug, Clone)]
pub struct InteractionInput {
    pub primary: DoseEvent,
    pub side_effect: SideEffectSpec,
    pub counter: Option<CounterDose>,
}

/// Runs the full curve pipeline: grid, PK curves, side-effect derivation,
/// normalization, overlap and recommendation. Holds no state between runs.
pub struct InteractionEngine {
    config: Config,
}

impl InteractionEngine {
    pub fn new(config: Config) -> PKResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn run(&self, input: &InteractionInput) -> PKResult<InteractionResult> {
        input.side_effect.validate()?;

        let ceilings = &self.config.curves;
        let primary = &input.primary;

        let mut dose_times = vec![primary.time];
        if let Some(counter) = &input.counter {
            dose_times.push(counter.event.time);
        }
        let grid = TimeGrid::anchored(&dose_times, &self.config.grid)?;
        debug!(
            "Grid starts {} with {} samples over {:.1} h",
            grid.start(),
            grid.len(),
            grid.window_hours()
        );

        if primary.params().is_degenerate() {
            warn!(
                "ka and ke of {} coincide; perturbing ka to keep the solution finite",
                primary.drug
            );
        }

        let since_primary = grid.time_since(primary.time);
        let primary_curve = normalize(
            &primary.model().curve(&since_primary),
            ceilings.primary_ceiling,
        );

        let side_effect_curve = input.side_effect.derive(
            primary.model(),
            &since_primary,
            &primary_curve,
            grid.step(),
            ceilings.side_effect_ceiling,
        );
        if peak(&side_effect_curve) <= 0.0 {
            warn!(
                "{} side-effect curve is zero across the window",
                input.side_effect.category()
            );
        }

        let counter_curve = match &input.counter {
            Some(counter) => {
                if counter.event.params().is_degenerate() {
                    warn!(
                        "ka and ke of {} coincide; perturbing ka to keep the solution finite",
                        counter.event.drug
                    );
                }
                let since_counter = grid.time_since(counter.event.time);
                normalize(
                    &counter.event.model().curve(&since_counter),
                    ceilings.counter_ceiling,
                )
            }
            None => vec![0.0; grid.len()],
        };

        let mitigation = mitigation_curve(&side_effect_curve, &counter_curve);
        let coverage = coverage_percent(
            &side_effect_curve,
            &mitigation,
            grid.step(),
            self.config.recommender.integration,
        );

        let recommendation = recommend(
            &grid,
            &side_effect_curve,
            primary.time,
            input.counter.as_ref(),
            &self.config.recommender,
            coverage,
        );
        info!(
            "{} ({}): onset +{:.2} h, peak +{:.2} h, coverage {:.1}%",
            primary.drug,
            input.side_effect.category(),
            recommendation.onset_hours,
            recommendation.peak_hours,
            coverage
        );

        Ok(InteractionResult {
            grid,
            primary_drug: primary.drug.clone(),
            counter_drug: input.counter.as_ref().map(|c| c.event.drug.clone()),
            side_effect: input.side_effect.clone(),
            primary_curve,
            side_effect_curve,
            counter_curve,
            mitigation_curve: mitigation,
            recommendation,
        })
    }
}
