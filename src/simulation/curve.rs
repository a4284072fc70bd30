//! Array primitives shared by every stage of the pipeline.
//!
//! All curves are plain `Vec<f64>` aligned index-for-index with a
//! [`TimeGrid`](super::TimeGrid), so pointwise operations need no resampling.

use serde::{Deserialize, Serialize};

/// Quadrature used to turn a curve into an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationRule {
    /// Sum of samples times the grid step.
    Sum,
    /// Trapezoidal rule: (y₁ + y₂) / 2 × Δt per segment.
    #[default]
    Trapezoid,
}

/// Largest sample, or 0.0 for an empty curve.
pub fn peak(curve: &[f64]) -> f64 {
    curve.iter().copied().fold(0.0, f64::max)
}

/// Index of the first sample holding the maximum.
pub fn argmax(curve: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in curve.iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Rescales `curve` so its maximum equals `ceiling`.
///
/// An all-zero curve is returned unchanged. Each call re-anchors to the
/// curve's own peak, so apply it once per curve.
pub fn normalize(curve: &[f64], ceiling: f64) -> Vec<f64> {
    let max = peak(curve);
    if max <= 0.0 {
        return curve.to_vec();
    }
    curve.iter().map(|&v| v / max * ceiling).collect()
}

/// Discrete first derivative on an evenly spaced grid.
///
/// Central differences in the interior, first-order one-sided differences at
/// both ends.
pub fn gradient(values: &[f64], step: f64) -> Vec<f64> {
    let n = values.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let mut grad = Vec::with_capacity(n);
            grad.push((values[1] - values[0]) / step);
            for i in 1..n - 1 {
                grad.push((values[i + 1] - values[i - 1]) / (2.0 * step));
            }
            grad.push((values[n - 1] - values[n - 2]) / step);
            grad
        }
    }
}

/// Running sum of `values` scaled by the grid step.
pub fn cumulative_integral(values: &[f64], step: f64) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |total, &v| {
            *total += v * step;
            Some(*total)
        })
        .collect()
}

pub fn integrate(values: &[f64], step: f64, rule: IntegrationRule) -> f64 {
    match rule {
        IntegrationRule::Sum => values.iter().sum::<f64>() * step,
        IntegrationRule::Trapezoid => values
            .windows(2)
            .map(|w| (w[0] + w[1]) / 2.0 * step)
            .sum(),
    }
}
