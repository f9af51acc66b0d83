//! NOAA SWPC client
//!
//! Fetches the plasma and magnetometer products concurrently. The whole
//! request is bounded by the client timeout; there are no retries here, the
//! next scheduled poll is the retry.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::parse::{parse_field, parse_plasma};
use super::{SampleSource, UpstreamBatch, UpstreamError};
use crate::constants::{APP_VERSION, DEFAULT_MAG_URL, DEFAULT_PLASMA_URL, DEFAULT_UPSTREAM_TIMEOUT};

#[derive(Debug, Clone)]
pub struct NoaaClient {
    client: reqwest::Client,
    plasma_url: String,
    mag_url: String,
}

impl NoaaClient {
    pub fn new(plasma_url: impl Into<String>, mag_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: http_client(timeout)?,
            plasma_url: plasma_url.into(),
            mag_url: mag_url.into(),
        })
    }

    /// Client for the default SWPC 1-day products
    pub fn swpc() -> Result<Self, UpstreamError> {
        Self::new(
            DEFAULT_PLASMA_URL,
            DEFAULT_MAG_URL,
            Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT),
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value, UpstreamError> {
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }
}

/// Build a client with the shared user agent and `timeout`
pub(super) fn http_client(timeout: Duration) -> Result<reqwest::Client, UpstreamError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(format!("solarwatch/{}", APP_VERSION))
        .build()?)
}

/// Non-2xx becomes `Status`, otherwise the body is decoded as JSON.
/// The reported url has its query (and any api key) stripped.
pub(super) async fn read_json(response: reqwest::Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    if !status.is_success() {
        let mut url = response.url().clone();
        url.set_query(None);
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response.json::<Value>().await?)
}

#[async_trait]
impl SampleSource for NoaaClient {
    async fn fetch(&self) -> Result<UpstreamBatch, UpstreamError> {
        let (plasma, field) = tokio::try_join!(
            self.get_json(&self.plasma_url),
            self.get_json(&self.mag_url)
        )?;

        let batch = UpstreamBatch {
            plasma: parse_plasma(&plasma)?,
            field: parse_field(&field)?,
        };

        log::debug!(
            "Fetched {} plasma rows and {} field rows",
            batch.plasma.len(),
            batch.field.len()
        );

        Ok(batch)
    }
}
