//! Forecaster - Flat-horizon exponential smoothing
//!
//! Known limitation: every horizon carries the same value (the rounded final
//! EWMA level). There is no trend or decay term.
//!
//! Rounding is half-up toward +∞ (`-2.5` → `-2`, `2.5` → `3`), as
//! JavaScript's `Math.round` does; `f64::round` would give `-3`.

use serde::{Deserialize, Serialize};

use super::anomaly::Metric;
use super::buffer::SampleBuffer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSeries {
    pub metric: Metric,
    pub alpha: f64,
    pub values: Vec<f64>,
}

/// Final EWMA level, seeded with the first element
pub fn ewma(values: &[f64], alpha: f64) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    Some(rest.iter().fold(*first, |s, x| alpha * x + (1.0 - alpha) * s))
}

/// Nearest integer, halves toward +∞
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// `steps` copies of the rounded EWMA level; empty input gives an empty forecast
pub fn forecast(values: &[f64], alpha: f64, steps: usize) -> Vec<f64> {
    match ewma(values, alpha) {
        Some(level) => vec![round_half_up(level); steps],
        None => Vec::new(),
    }
}

/// Forecast `metric` from the last `n` samples, skipping nulls
pub fn forecast_metric(
    buffer: &SampleBuffer,
    metric: Metric,
    n: usize,
    alpha: f64,
    steps: usize,
) -> ForecastSeries {
    let values: Vec<f64> = buffer.tail_iter(n).filter_map(|s| metric.value(s)).collect();
    ForecastSeries {
        metric,
        alpha,
        values: forecast(&values, alpha, steps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_projection() {
        let values = forecast(&[10.0, 20.0, 30.0], 0.25, 3);
        // s = 10 → 12.5 → 16.875
        assert_eq!(values, vec![17.0, 17.0, 17.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(forecast(&[], 0.25, 6).is_empty());
        assert_eq!(ewma(&[], 0.25), None);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(forecast(&[451.6], 0.25, 2), vec![452.0, 452.0]);
    }

    #[test]
    fn test_alpha_one_tracks_last_value() {
        assert_eq!(ewma(&[1.0, 2.0, 9.0], 1.0), Some(9.0));
    }

    #[test]
    fn test_halves_round_toward_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        // southward Bz level of exactly -2.5
        assert_eq!(forecast(&[-2.5], 0.25, 2), vec![-2.0, -2.0]);
    }

    #[test]
    fn test_zero_steps() {
        assert!(forecast(&[1.0, 2.0], 0.25, 0).is_empty());
    }
}
