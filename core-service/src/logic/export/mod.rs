//! Export Module - Detection log as CSV / JSON
//!
//! Reads from the durable store when one is available, otherwise (or on
//! failure, or when the store has nothing) from the in-memory log. Both
//! paths return detections newest first.

pub mod csv;


use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::rules::Detection;
use super::store::DetectionStore;
use crate::constants::{DEFAULT_EXPORT_LIMIT, MAX_EXPORT_LIMIT};

pub use self::csv::{csv_row, stream_csv, CsvStream, ExportError, CSV_HEADER, UTF8_BOM};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Unknown or missing formats fall back to CSV
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Csv => "cme_detections.csv",
            Self::Json => "cme_detections.json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Clamp a requested export limit: missing or non-positive → default,
/// above the maximum → maximum
pub fn clamp_limit(limit: Option<i64>) -> usize {
    match limit {
        Some(n) if n > 0 => (n as u64).min(MAX_EXPORT_LIMIT as u64) as usize,
        _ => DEFAULT_EXPORT_LIMIT,
    }
}

/// Detections for a JSON export.
///
/// `fallback` is the newest-first tail of the in-memory log.
pub async fn collect_json(
    store: &dyn DetectionStore,
    fallback: Vec<Detection>,
    limit: usize,
) -> Vec<Detection> {
    if !store.is_available() {
        return fallback;
    }

    match store.recent_detections(limit).await {
        Ok(rows) if !rows.is_empty() => rows,
        Ok(_) => {
            log::debug!("Store returned no detections, exporting in-memory log");
            fallback
        }
        Err(e) => {
            log::warn!("Store read failed, exporting in-memory log: {}", e);
            fallback
        }
    }
}
