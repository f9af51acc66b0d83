//! DONKI CME catalog
//!
//! Passthrough to NASA's Space Weather Database Of Notifications, Knowledge,
//! Information. The body is returned as delivered; only its top-level shape
//! is checked.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::client::{http_client, read_json};
use super::UpstreamError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogQueryError {
    #[error("invalid {field} '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("startDate is after endDate")]
    Reversed,
}

/// Optional date range; DONKI applies its own defaults for missing bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CatalogQuery {
    /// Parse `YYYY-MM-DD` bounds. Blank values count as missing.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, CatalogQueryError> {
        let query = Self {
            start_date: parse_date("startDate", start)?,
            end_date: parse_date("endDate", end)?,
        };

        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(CatalogQueryError::Reversed);
            }
        }

        Ok(query)
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format(DATE_FORMAT).to_string()));
        }
        pairs
    }
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, CatalogQueryError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, DATE_FORMAT)
            .map(Some)
            .map_err(|_| CatalogQueryError::InvalidDate { field, value: v.to_string() }),
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Catalogued CMEs in the range, as an array of provider records
    async fn cme_catalog(&self, query: &CatalogQuery) -> Result<Value, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct DonkiClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl DonkiClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl CatalogSource for DonkiClient {
    async fn cme_catalog(&self, query: &CatalogQuery) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(&query.query_pairs())
            .send()
            .await?;

        let body = read_json(response).await?;
        if !body.is_array() {
            return Err(UpstreamError::Malformed(format!("{}: expected a JSON array", self.url)));
        }

        log::debug!("DONKI returned {} CME records", body.as_array().map_or(0, Vec::len));
        Ok(body)
    }
}
