//! Detection record types

use serde::{Deserialize, Serialize};

use crate::constants::AU_KM;
use crate::logic::anomaly::AnomalyResult;
use crate::logic::sample::Timestamp;
use crate::logic::scorer::{SeverityClass, SeverityLabel};

/// Intensity bucket by solar wind speed (km/s)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    #[serde(rename = "Very Strong")]
    VeryStrong,
    Strong,
    Moderate,
    Mild,
    Nominal,
}

impl Intensity {
    pub fn from_speed(speed: f64) -> Self {
        if speed > 3000.0 {
            Self::VeryStrong
        } else if speed > 1500.0 {
            Self::Strong
        } else if speed > 1200.0 {
            Self::Moderate
        } else if speed > 400.0 {
            Self::Mild
        } else {
            Self::Nominal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryStrong => "Very Strong",
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Mild => "Mild",
            Self::Nominal => "Nominal",
        }
    }
}

/// A fired CME candidate. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// `{time}_{round(speed)}`, the deduplication key
    pub id: String,
    pub time: Timestamp,
    pub speed: f64,
    pub density: f64,
    pub bz: f64,
    pub delta_v: Option<f64>,
    pub forecast_arrival_hours: Option<i64>,
    pub intensity: Intensity,
    pub dynamic_pressure: Option<f64>,
    pub bz_integral: f64,
    pub score: f64,
    pub severity_label: SeverityLabel,
    pub severity_class: SeverityClass,
    pub anomaly: AnomalyResult,
}

impl Detection {
    pub fn make_id(time: &Timestamp, speed: f64) -> String {
        format!("{}_{}", time, speed.round() as i64)
    }
}

/// Sun-Earth transit time in whole hours at constant `speed` (km/s)
pub fn arrival_hours(speed: f64) -> Option<i64> {
    if speed <= 0.0 {
        return None;
    }
    Some((AU_KM / speed / 3600.0).round() as i64)
}
