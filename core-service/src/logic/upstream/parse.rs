//! Row parsing for the SWPC array-of-arrays products
//!
//! plasma: `[time_tag, density, speed, temperature]`
//! mag:    `[time_tag, bx_gsm, by_gsm, bz_gsm, lon_gsm, lat_gsm, bt]`

use serde_json::Value;

use super::UpstreamError;
use crate::logic::sample::{FieldSample, PlasmaSample, Timestamp};

/// Numbers and numeric strings parse; anything else is `None`
pub fn parse_number(cell: Option<&Value>) -> Option<f64> {
    let value = match cell? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

/// Data rows after the header. Rows without a textual timestamp are dropped.
fn data_rows(payload: &Value) -> Result<impl Iterator<Item = (Timestamp, &[Value])>, UpstreamError> {
    let rows = payload
        .as_array()
        .ok_or_else(|| UpstreamError::Malformed("expected a top-level array".to_string()))?;

    Ok(rows.iter().skip(1).filter_map(|row| {
        let cells = row.as_array()?;
        let time = cells.first()?.as_str()?.trim();
        if time.is_empty() {
            return None;
        }
        Some((Timestamp::new(time), cells.as_slice()))
    }))
}

pub fn parse_plasma(payload: &Value) -> Result<Vec<PlasmaSample>, UpstreamError> {
    Ok(data_rows(payload)?
        .map(|(time, cells)| PlasmaSample {
            time,
            density: parse_number(cells.get(1)),
            speed: parse_number(cells.get(2)),
            temperature: parse_number(cells.get(3)),
        })
        .collect())
}

pub fn parse_field(payload: &Value) -> Result<Vec<FieldSample>, UpstreamError> {
    Ok(data_rows(payload)?
        .map(|(time, cells)| FieldSample {
            time,
            bx: parse_number(cells.get(1)),
            by: parse_number(cells.get(2)),
            bz: parse_number(cells.get(3)),
        })
        .collect())
}
