//! Upstream Module - Solar wind data provider
//!
//! The provider delivers two arrays-of-arrays (plasma, magnetic field), each
//! led by a header row. Numeric parse failures become `None`, never errors.

pub mod catalog;
pub mod client;
pub mod parse;

use async_trait::async_trait;
use thiserror::Error;

use super::sample::{FieldSample, PlasmaSample};

pub use catalog::{CatalogQuery, CatalogQueryError, CatalogSource, DonkiClient};
pub use client::NoaaClient;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// One poll worth of rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamBatch {
    pub plasma: Vec<PlasmaSample>,
    pub field: Vec<FieldSample>,
}

#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn fetch(&self) -> Result<UpstreamBatch, UpstreamError>;
}
