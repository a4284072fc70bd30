use super::curve::{integrate, IntegrationRule};

/// Pointwise minimum of the side-effect and counter curves.
pub fn mitigation_curve(side_effect: &[f64], counter: &[f64]) -> Vec<f64> {
    debug_assert_eq!(side_effect.len(), counter.len());
    side_effect
        .iter()
        .zip(counter)
        .map(|(&se, &c)| se.min(c))
        .collect()
}

/// Share of the side-effect area covered by the mitigation curve, in percent.
/// Zero when there is no side-effect burden to cover.
pub fn coverage_percent(
    side_effect: &[f64],
    mitigation: &[f64],
    step: f64,
    rule: IntegrationRule,
) -> f64 {
    let burden = integrate(side_effect, step, rule);
    if burden <= 0.0 {
        return 0.0;
    }
    let covered = integrate(mitigation, step, rule);
    (covered / burden * 100.0).clamp(0.0, 100.0)
}
