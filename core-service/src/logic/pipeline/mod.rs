//! Pipeline - Explicitly owned detection state
//!
//! Constructed once at startup and shared behind an `Arc`. A single lock
//! guards the sample buffer and the detection log together; mutation
//! (append + evict + scan + truncate) happens in one critical section so a
//! reader never sees a half-applied batch. The lock is never held across an
//! await: store mirroring runs after it is released.

pub mod snapshot;


use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;

use super::anomaly::{self, Metric};
use super::buffer::{BufferStatus, SampleBuffer};
use super::config::PipelineConfig;
use super::export::{self, CsvStream};
use super::features;
use super::forecast::forecast_metric;
use super::rules::{Detection, DetectionLog, RuleConditions, RuleEngine};
use super::sample::Sample;
use super::scorer;
use super::store::{DetectionStore, NoopStore};
use super::upstream::{SampleSource, UpstreamBatch, UpstreamError};
use crate::constants::DEFAULT_QUERY_COUNT;

pub use snapshot::{
    AlertStatus, DetectOutcome, IngestReport, LatestSnapshot, Prediction, RiskLevel,
    SampleAssessment,
};

struct PipelineState {
    buffer: SampleBuffer,
    log: DetectionLog,
}

pub struct Pipeline {
    config: PipelineConfig,
    engine: RuleEngine,
    state: RwLock<PipelineState>,
    store: Arc<dyn DetectionStore>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, store: Arc<dyn DetectionStore>) -> Self {
        let state = PipelineState {
            buffer: SampleBuffer::new(config.buffer_capacity),
            log: DetectionLog::new(config.log_capacity),
        };

        Self {
            engine: RuleEngine::new(&config),
            config,
            state: RwLock::new(state),
            store,
        }
    }

    /// Pipeline without a durable store
    pub fn in_memory(config: PipelineConfig) -> Self {
        Self::new(config, Arc::new(NoopStore))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn DetectionStore> {
        self.store.clone()
    }

    // ========================================================================
    // INGESTION
    // ========================================================================

    /// Fetch from `source` and ingest. On failure the state is untouched.
    pub async fn poll(&self, source: &dyn SampleSource) -> Result<IngestReport, UpstreamError> {
        match source.fetch().await {
            Ok(batch) => Ok(self.ingest(batch).await),
            Err(e) => {
                log::warn!("Ingestion cycle skipped: {}", e);
                Err(e)
            }
        }
    }

    /// Append a batch, rescan, then mirror new data to the store
    pub async fn ingest(&self, batch: UpstreamBatch) -> IngestReport {
        let received = batch.plasma.len();

        let (outcome, created) = {
            let mut guard = self.state.write();
            let PipelineState { buffer, log } = &mut *guard;

            let outcome = buffer.append_batch(&batch.plasma, &batch.field);
            if let Some(oldest) = buffer.oldest() {
                log.forget_before(oldest);
            }
            let created = self.engine.run(buffer, log);
            (outcome, created)
        };

        log::info!(
            "Ingested {} of {} rows ({} updated, {} skipped, {} evicted), {} new detections",
            outcome.appended.len(),
            received,
            outcome.updated.len(),
            outcome.skipped,
            outcome.evicted,
            created.len()
        );

        let changed: Vec<Sample> = outcome.appended.iter().chain(&outcome.updated).cloned().collect();
        self.mirror(&changed, &created).await;

        IngestReport {
            received,
            appended: outcome.appended.len(),
            updated: outcome.updated.len(),
            skipped: outcome.skipped,
            evicted: outcome.evicted,
            new_detections: created,
        }
    }

    /// Forced rescan of the current buffer
    pub async fn detect(&self) -> DetectOutcome {
        let (created, all) = {
            let mut guard = self.state.write();
            let PipelineState { buffer, log } = &mut *guard;
            let created = self.engine.run(buffer, log);
            (created, log.snapshot())
        };

        self.mirror(&[], &created).await;

        DetectOutcome { new: created, all }
    }

    /// Best-effort: failures are logged, never propagated
    async fn mirror(&self, samples: &[Sample], detections: &[Detection]) {
        for d in detections {
            log::info!(
                "CME candidate {} speed={} km/s density={} bz={} nT score={} ({})",
                d.id,
                d.speed,
                d.density,
                d.bz,
                d.score,
                d.severity_label.as_str()
            );
        }

        if !self.store.is_available() {
            return;
        }

        if !samples.is_empty() {
            if let Err(e) = self.store.upsert_samples(samples).await {
                log::warn!("Failed to mirror {} samples: {}", samples.len(), e);
            }
        }

        for d in detections {
            if let Err(e) = self.store.upsert_detection(d).await {
                log::warn!("Failed to mirror detection {}: {}", d.id, e);
            }
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Missing or non-positive → default, capped at buffer capacity
    pub fn clamp_count(&self, n: Option<i64>) -> usize {
        let capacity = self.config.buffer_capacity;
        match n {
            Some(n) if n > 0 => (n as u64).min(capacity as u64) as usize,
            _ => DEFAULT_QUERY_COUNT.min(capacity),
        }
    }

    pub fn latest(&self, n: Option<i64>) -> LatestSnapshot {
        let n = self.clamp_count(n);
        let (alpha, steps) = (self.config.forecast_alpha, self.config.forecast_steps);
        let state = self.state.read();

        LatestSnapshot {
            samples: state.buffer.tail(n),
            speed_forecast: forecast_metric(&state.buffer, Metric::Speed, n, alpha, steps),
            bz_forecast: forecast_metric(&state.buffer, Metric::Bz, n, alpha, steps),
            generated_at: Utc::now(),
        }
    }

    /// The full retained detection log, oldest first
    pub fn events(&self) -> Vec<Detection> {
        self.state.read().log.snapshot()
    }

    /// A retained detection by id
    pub fn event(&self, id: &str) -> Option<Detection> {
        self.state.read().log.get(id).cloned()
    }

    pub fn predict(&self, n: Option<i64>) -> Prediction {
        let n = self.clamp_count(n);
        let (alpha, steps) = (self.config.forecast_alpha, self.config.forecast_steps);
        let state = self.state.read();

        let forecasts = Metric::ALL
            .iter()
            .map(|&metric| forecast_metric(&state.buffer, metric, n, alpha, steps))
            .collect();

        Prediction {
            window: n,
            steps,
            forecasts,
            latest: self.assess_newest(&state.buffer),
            generated_at: Utc::now(),
        }
    }

    /// Score, severity and anomaly for the newest sample with speed,
    /// density and bz all present
    fn assess_newest(&self, buffer: &SampleBuffer) -> Option<SampleAssessment> {
        let i = (0..buffer.len()).rev().find(|&i| {
            buffer
                .at(i)
                .is_some_and(|s| s.speed().is_some() && s.density().is_some() && s.bz().is_some())
        })?;

        let sample = buffer.at(i)?;
        let (speed, density, bz) = (sample.speed()?, sample.density()?, sample.bz()?);
        let delta_v = features::delta_v(buffer, i, self.engine.delta_window());
        let card = scorer::score(speed, density, bz, delta_v);
        let conditions = RuleConditions::evaluate(self.engine.thresholds(), speed, density, bz, delta_v);

        Some(SampleAssessment {
            time: sample.time.clone(),
            speed,
            density,
            bz,
            delta_v,
            score: card.score,
            severity_label: card.severity_label,
            severity_class: card.severity_class,
            anomaly: anomaly::evaluate(buffer, i),
            candidate: conditions.fires(),
        })
    }

    /// Risk level derived from the newest detection
    pub fn alert(&self) -> AlertStatus {
        match self.state.read().log.latest() {
            Some(detection) => AlertStatus::from_detection(detection),
            None => AlertStatus::all_clear(),
        }
    }

    pub fn buffer_status(&self) -> BufferStatus {
        self.state.read().buffer.status()
    }

    // ========================================================================
    // EXPORT
    // ========================================================================

    pub async fn export_json(&self, limit: Option<i64>) -> Vec<Detection> {
        let limit = export::clamp_limit(limit);
        let fallback = self.state.read().log.newest_first(limit);
        export::collect_json(self.store.as_ref(), fallback, limit).await
    }

    pub fn export_csv(&self, limit: Option<i64>) -> CsvStream {
        let limit = export::clamp_limit(limit);
        let fallback = self.state.read().log.newest_first(limit);
        export::stream_csv(self.store.clone(), fallback, limit)
    }
}
