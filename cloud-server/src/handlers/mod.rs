//! HTTP handlers

pub mod health;
pub mod samples;
pub mod events;
pub mod predict;
pub mod export;
pub mod catalog;


use serde::Deserialize;

/// `?n=` window size. Unparsable values count as missing.
#[derive(Debug, Deserialize, Default)]
pub struct CountQuery {
    pub n: Option<String>,
}

impl CountQuery {
    pub fn count(&self) -> Option<i64> {
        lenient_int(self.n.as_deref())
    }
}

pub(crate) fn lenient_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}
