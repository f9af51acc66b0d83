//! Streaming CSV writer
//!
//! Rows are produced by a spawned task into a bounded channel. When the
//! receiving side goes away the task stops and drops the store cursor.

use bytes::Bytes;
use futures::StreamExt;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::logic::rules::Detection;
use crate::logic::store::{DetectionStore, StoreError};

pub const UTF8_BOM: &str = "\u{feff}";

pub const CSV_HEADER: &str = "id,time,speed,density,bz,deltaV,forecastArrivalHours,intensity,\
dynamicPressure,bzIntegral,score,severityLabel,severityClass,isAnomaly,triggeredMetrics";

const CHANNEL_DEPTH: usize = 64;

pub type CsvStream = ReceiverStream<io::Result<Bytes>>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("field {0} is not a finite number")]
    NonFinite(&'static str),
}

/// Quote a field if it contains a comma, quote or line break
pub fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn number(name: &'static str, value: f64) -> Result<String, ExportError> {
    if value.is_finite() {
        Ok(value.to_string())
    } else {
        Err(ExportError::NonFinite(name))
    }
}

fn optional(name: &'static str, value: Option<f64>) -> Result<String, ExportError> {
    value.map(|v| number(name, v)).transpose().map(Option::unwrap_or_default)
}

/// Unescaped field values in header order
pub fn csv_fields(d: &Detection) -> Result<Vec<String>, ExportError> {
    let triggered: Vec<&str> = d.anomaly.triggered_metrics.iter().map(|m| m.as_str()).collect();

    Ok(vec![
        d.id.clone(),
        d.time.to_string(),
        number("speed", d.speed)?,
        number("density", d.density)?,
        number("bz", d.bz)?,
        optional("deltaV", d.delta_v)?,
        d.forecast_arrival_hours.map(|h| h.to_string()).unwrap_or_default(),
        d.intensity.as_str().to_string(),
        optional("dynamicPressure", d.dynamic_pressure)?,
        number("bzIntegral", d.bz_integral)?,
        number("score", d.score)?,
        d.severity_label.as_str().to_string(),
        d.severity_class.as_str().to_string(),
        d.anomaly.is_anomaly.to_string(),
        triggered.join(";"),
    ])
}

/// One CSV line including the trailing CRLF
pub fn csv_row(d: &Detection) -> Result<String, ExportError> {
    let fields = csv_fields(d)?;
    let mut line = fields.iter().map(|f| escape(f)).collect::<Vec<_>>().join(",");
    line.push_str("\r\n");
    Ok(line)
}

/// Stream the CSV export.
///
/// Tries the store cursor first. If the store is unavailable, yields no
/// rows, or fails before any row was sent, the in-memory `fallback`
/// (newest first) is written instead.
pub fn stream_csv(
    store: Arc<dyn DetectionStore>,
    fallback: Vec<Detection>,
    limit: usize,
) -> CsvStream {
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);

    tokio::spawn(async move {
        match write_csv(store.as_ref(), fallback, limit, &tx).await {
            Ok(rows) => log::info!("CSV export finished: {} rows", rows),
            Err(Disconnected) => log::info!("CSV export aborted: client disconnected"),
        }
    });

    ReceiverStream::new(rx)
}

/// Receiver dropped
struct Disconnected;

async fn send(tx: &mpsc::Sender<io::Result<Bytes>>, chunk: String) -> Result<(), Disconnected> {
    tx.send(Ok(Bytes::from(chunk))).await.map_err(|_| Disconnected)
}

async fn write_csv(
    store: &dyn DetectionStore,
    fallback: Vec<Detection>,
    limit: usize,
    tx: &mpsc::Sender<io::Result<Bytes>>,
) -> Result<usize, Disconnected> {
    send(tx, format!("{}{}\r\n", UTF8_BOM, CSV_HEADER)).await?;

    if store.is_available() {
        let mut sent = 0usize;
        let mut failure = None;

        {
            let mut cursor = store.stream_detections(limit);
            while let Some(item) = cursor.next().await {
                match item {
                    Ok(detection) => match csv_row(&detection) {
                        Ok(line) => {
                            send(tx, line).await?;
                            sent += 1;
                        }
                        Err(e) => log::warn!("Skipping detection {}: {}", detection.id, e),
                    },
                    Err(StoreError::Decode(e)) => log::warn!("Skipping undecodable stored detection: {}", e),
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }
        }

        match (sent, failure) {
            (0, Some(e)) => log::warn!("Store stream failed, exporting in-memory log: {}", e),
            (0, None) => log::debug!("Store returned no detections, exporting in-memory log"),
            (n, Some(e)) => {
                log::warn!("Store stream failed after {} rows, ending export: {}", n, e);
                return Ok(n);
            }
            (n, None) => return Ok(n),
        }
    }

    let mut sent = 0usize;
    for detection in fallback.iter().take(limit) {
        match csv_row(detection) {
            Ok(line) => {
                send(tx, line).await?;
                sent += 1;
            }
            Err(e) => log::warn!("Skipping detection {}: {}", detection.id, e),
        }
    }

    Ok(sent)
}
