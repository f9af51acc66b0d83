//! SolarWatch Server
//!
//! Polls the NOAA SWPC real-time solar wind feed, runs CME detection and
//! serves the results over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SOLARWATCH SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │ Scheduler │  │  Pipeline               │ │
//! │  │  (Axum)   │──│ (interval)│──│  buffer · rules · log   │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        │              │ NOAA SWPC           │ best-effort  │
//! │        │              ▼                     ▼              │
//! │        │        ┌───────────┐        ┌─────────────┐       │
//! │        └───────▶│  export   │◀───────│ PostgreSQL  │       │
//! │                 └───────────┘        └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod scheduler;
mod store;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::net::SocketAddr;
use std::sync::Arc;

use solarwatch_core::{CatalogSource, DonkiClient, NoaaClient, Pipeline, PipelineConfig, SampleSource};

pub use error::{AppError, AppResult};

const DEFAULT_LOG_FILTER: &str = "solarwatch_server=debug,solarwatch_core=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging; `log` records from the core are bridged
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("SolarWatch Server starting...");

    let pipeline_config = PipelineConfig::from_env();
    tracing::info!(
        "Buffer capacity {}, detection log {}, thresholds {:?}",
        pipeline_config.buffer_capacity,
        pipeline_config.log_capacity,
        pipeline_config.thresholds
    );

    let store = store::connect(&config).await;
    let pipeline = Arc::new(Pipeline::new(pipeline_config, store));

    let source: Arc<dyn SampleSource> = Arc::new(NoaaClient::new(
        config.plasma_url.clone(),
        config.mag_url.clone(),
        config.upstream_timeout,
    )?);

    let catalog: Arc<dyn CatalogSource> = Arc::new(DonkiClient::new(
        config.donki_url.clone(),
        config.nasa_api_key.clone(),
        config.upstream_timeout,
    )?);

    scheduler::spawn(pipeline.clone(), source.clone(), config.poll_interval);

    // Build application state
    let state = AppState {
        pipeline,
        source,
        catalog,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub source: Arc<dyn SampleSource>,
    pub catalog: Arc<dyn CatalogSource>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Samples
        .route("/api/v1/latest", get(handlers::samples::latest))
        .route("/api/v1/buffer", get(handlers::samples::buffer))
        .route("/api/v1/ingest", post(handlers::samples::ingest))

        // Detections
        .route("/api/v1/events", get(handlers::events::list))
        .route("/api/v1/events/:id", get(handlers::events::get))
        .route("/api/v1/detect", post(handlers::events::detect))
        .route("/api/v1/alerts", get(handlers::events::alerts))

        // Forecast
        .route("/api/v1/predict", get(handlers::predict::predict))

        // Export
        .route("/api/v1/export", get(handlers::export::export))

        // External catalogs
        .route("/api/v1/external/donki", get(handlers::catalog::donki));

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
