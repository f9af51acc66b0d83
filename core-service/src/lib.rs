//! SolarWatch Core - Solar wind CME detection pipeline
//!
//! Ingests plasma and magnetic-field samples, keeps a bounded rolling
//! history and flags Coronal-Mass-Ejection-like disturbances.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────────────────┐
//! │ SampleSource │──▶│ SampleBuffer │──▶│ RuleEngine                   │
//! │ (NOAA SWPC)  │   │ (ring, 3000) │   │  ├─ features (ΔV, Pdyn, ∫Bz) │
//! └──────────────┘   └──────┬───────┘   │  ├─ anomaly (z-score)        │
//!                           │           │  └─ scorer (risk, severity)  │
//!                           ▼           └──────────────┬───────────────┘
//!                    ┌────────────┐                    ▼
//!                    │ forecast   │           ┌────────────────┐   ┌───────────────┐
//!                    │ (EWMA)     │           │ DetectionLog   │──▶│ DetectionStore│
//!                    └────────────┘           │ (cap 100)      │   │ (optional)    │
//!                                             └───────┬────────┘   └───────────────┘
//!                                                     ▼
//!                                               export (CSV/JSON)
//! ```

pub mod constants;
pub mod logic;

pub use logic::config::{PipelineConfig, RuleThresholds};
pub use logic::buffer::BufferStatus;
pub use logic::export::ExportFormat;
pub use logic::pipeline::{AlertStatus, DetectOutcome, IngestReport, LatestSnapshot, Pipeline, Prediction};
pub use logic::sample::{FieldSample, PlasmaSample, Sample, Timestamp};
pub use logic::rules::Detection;
pub use logic::store::{DetectionStore, InMemoryStore, NoopStore, StoreError};
pub use logic::upstream::{
    CatalogQuery, CatalogQueryError, CatalogSource, DonkiClient, NoaaClient, SampleSource,
    UpstreamBatch, UpstreamError,
};
