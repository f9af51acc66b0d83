//! In-memory store implementation

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use super::{DetectionStore, StoreResult};
use crate::logic::rules::Detection;
use crate::logic::sample::{Sample, Timestamp};

/// Process-local store keyed like the durable one (detections by id,
/// samples by time). Upserts are idempotent.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    detections: RwLock<HashMap<String, Detection>>,
    samples: RwLock<BTreeMap<Timestamp, Sample>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detection_count(&self) -> usize {
        self.detections.read().len()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.read().len()
    }

    fn sorted_recent(&self, limit: usize) -> Vec<Detection> {
        let mut rows: Vec<Detection> = self.detections.read().values().cloned().collect();
        rows.sort_by(|a, b| b.time.cmp(&a.time).then_with(|| b.id.cmp(&a.id)));
        rows.truncate(limit);
        rows
    }
}

#[async_trait]
impl DetectionStore for InMemoryStore {
    async fn upsert_detection(&self, detection: &Detection) -> StoreResult<()> {
        self.detections
            .write()
            .insert(detection.id.clone(), detection.clone());
        Ok(())
    }

    async fn upsert_samples(&self, samples: &[Sample]) -> StoreResult<()> {
        let mut guard = self.samples.write();
        for sample in samples {
            guard.insert(sample.time.clone(), sample.clone());
        }
        Ok(())
    }

    async fn recent_detections(&self, limit: usize) -> StoreResult<Vec<Detection>> {
        Ok(self.sorted_recent(limit))
    }

    fn stream_detections(&self, limit: usize) -> BoxStream<'_, StoreResult<Detection>> {
        stream::iter(self.sorted_recent(limit).into_iter().map(Ok)).boxed()
    }
}
