//! Query result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::anomaly::AnomalyResult;
use crate::logic::forecast::ForecastSeries;
use crate::logic::rules::Detection;
use crate::logic::sample::{Sample, Timestamp};
use crate::logic::scorer::{SeverityClass, SeverityLabel};

/// Outcome of one ingestion cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub received: usize,
    pub appended: usize,
    /// Buffered samples completed by late readings
    pub updated: usize,
    pub skipped: usize,
    pub evicted: usize,
    pub new_detections: Vec<Detection>,
}

/// Forced rescan result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectOutcome {
    pub new: Vec<Detection>,
    pub all: Vec<Detection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSnapshot {
    pub samples: Vec<Sample>,
    pub speed_forecast: ForecastSeries,
    pub bz_forecast: ForecastSeries,
    pub generated_at: DateTime<Utc>,
}

/// Quick assessment of the newest complete sample
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleAssessment {
    pub time: Timestamp,
    pub speed: f64,
    pub density: f64,
    pub bz: f64,
    pub delta_v: Option<f64>,
    pub score: f64,
    pub severity_label: SeverityLabel,
    pub severity_class: SeverityClass,
    pub anomaly: AnomalyResult,
    /// Whether the candidate rule fires for this sample
    pub candidate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub window: usize,
    pub steps: usize,
    pub forecasts: Vec<ForecastSeries>,
    pub latest: Option<SampleAssessment>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    pub risk_level: RiskLevel,
    pub message: String,
    pub eta_hours: Option<i64>,
    pub detection_id: Option<String>,
}

impl AlertStatus {
    pub fn all_clear() -> Self {
        Self {
            risk_level: RiskLevel::Green,
            message: "No CME detected. All clear.".to_string(),
            eta_hours: None,
            detection_id: None,
        }
    }

    pub fn from_detection(detection: &Detection) -> Self {
        let (risk_level, message) = match detection.severity_label {
            SeverityLabel::Strong => (
                RiskLevel::Red,
                "Strong CME detected! High risk to satellites and power grids. Take immediate action.",
            ),
            SeverityLabel::Moderate => (
                RiskLevel::Yellow,
                "Moderate CME detected. Monitor systems and prepare for possible impact.",
            ),
            SeverityLabel::Mild => (
                RiskLevel::Yellow,
                "Mild CME detected. Low risk, but monitor for updates.",
            ),
            SeverityLabel::Nominal => return Self {
                detection_id: Some(detection.id.clone()),
                eta_hours: detection.forecast_arrival_hours,
                ..Self::all_clear()
            },
        };

        let message = match detection.forecast_arrival_hours {
            Some(eta) => format!("{} Estimated impact at Earth in {} hours.", message, eta),
            None => message.to_string(),
        };

        Self {
            risk_level,
            message,
            eta_hours: detection.forecast_arrival_hours,
            detection_id: Some(detection.id.clone()),
        }
    }
}
