//! Detection Store - Optional durable mirror
//!
//! Best-effort sink for detections and raw samples. The in-memory pipeline
//! state stays authoritative; a store only serves durability and cursor
//! based export. `NoopStore` stands in when no store is configured.

pub mod memory;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use thiserror::Error;

use super::rules::Detection;
use super::sample::Sample;

pub use memory::InMemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable")]
    Unavailable,

    #[error("database error: {0}")]
    Database(String),

    /// A single stored record could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DetectionStore: Send + Sync {
    /// False for the no-op store
    fn is_available(&self) -> bool {
        true
    }

    /// Insert or replace by `id`
    async fn upsert_detection(&self, detection: &Detection) -> StoreResult<()>;

    /// Insert or replace by sample time
    async fn upsert_samples(&self, samples: &[Sample]) -> StoreResult<()>;

    /// Up to `limit` detections, most recent time first
    async fn recent_detections(&self, limit: usize) -> StoreResult<Vec<Detection>>;

    /// Cursor over up to `limit` detections, most recent time first.
    ///
    /// Dropping the stream releases the cursor.
    fn stream_detections(&self, limit: usize) -> BoxStream<'_, StoreResult<Detection>>;
}

/// Store used when no durable backend is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

#[async_trait]
impl DetectionStore for NoopStore {
    fn is_available(&self) -> bool {
        false
    }

    async fn upsert_detection(&self, _detection: &Detection) -> StoreResult<()> {
        Ok(())
    }

    async fn upsert_samples(&self, _samples: &[Sample]) -> StoreResult<()> {
        Ok(())
    }

    async fn recent_detections(&self, _limit: usize) -> StoreResult<Vec<Detection>> {
        Err(StoreError::Unavailable)
    }

    fn stream_detections(&self, _limit: usize) -> BoxStream<'_, StoreResult<Detection>> {
        stream::once(async { Err(StoreError::Unavailable) }).boxed()
    }
}
