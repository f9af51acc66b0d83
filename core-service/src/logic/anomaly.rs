//! Anomaly Detector - Trailing-window z-score per metric
//!
//! Stateless: statistics are recomputed from buffer contents on every call.
//! A metric with fewer than `ANOMALY_MIN_SAMPLES` non-null values in its
//! window (or a null current value) yields no result.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::buffer::SampleBuffer;
use super::sample::Sample;
use crate::constants::{
    ANOMALY_MIN_SAMPLES, ANOMALY_STD_EPSILON, ANOMALY_WINDOW, ANOMALY_Z_THRESHOLD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Speed,
    Density,
    Bz,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Speed, Metric::Density, Metric::Bz];

    pub fn value(self, sample: &Sample) -> Option<f64> {
        match self {
            Metric::Speed => sample.speed(),
            Metric::Density => sample.density(),
            Metric::Bz => sample.bz(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Speed => "speed",
            Metric::Density => "density",
            Metric::Bz => "bz",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyResult {
    pub triggered_metrics: BTreeSet<Metric>,
    pub per_metric_z_score: BTreeMap<Metric, f64>,
    pub is_anomaly: bool,
}

/// z-score of `metric` at index `i` against `[max(0, i - 60), i)`
pub fn z_score(buffer: &SampleBuffer, i: usize, metric: Metric) -> Option<f64> {
    let current = metric.value(buffer.at(i)?)?;

    let start = i.saturating_sub(ANOMALY_WINDOW);
    let window: Vec<f64> = (start..i)
        .filter_map(|j| buffer.at(j).and_then(|s| metric.value(s)))
        .collect();

    if window.len() < ANOMALY_MIN_SAMPLES {
        return None;
    }

    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt().max(ANOMALY_STD_EPSILON);

    Some((current - mean) / std)
}

/// Evaluate every tracked metric at index `i`
pub fn evaluate(buffer: &SampleBuffer, i: usize) -> AnomalyResult {
    let mut result = AnomalyResult::default();

    for metric in Metric::ALL {
        if let Some(z) = z_score(buffer, i, metric) {
            result.per_metric_z_score.insert(metric, z);
            if z.abs() > ANOMALY_Z_THRESHOLD {
                result.triggered_metrics.insert(metric);
            }
        }
    }

    result.is_anomaly = !result.triggered_metrics.is_empty();
    result
}
