//! PostgreSQL detection store and store selection

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use sqlx::PgPool;
use std::sync::Arc;

use solarwatch_core::logic::store::StoreResult;
use solarwatch_core::{Detection, DetectionStore, InMemoryStore, NoopStore, Sample, StoreError};

use crate::config::{Config, StoreKind};
use crate::db;
use crate::models::{DetectionRow, SampleRow};

pub struct PgDetectionStore {
    pool: PgPool,
}

impl PgDetectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Column decode failures affect one record; everything else is the database
fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => StoreError::Decode(err.to_string()),
        other => StoreError::Database(other.to_string()),
    }
}

#[async_trait]
impl DetectionStore for PgDetectionStore {
    async fn upsert_detection(&self, detection: &Detection) -> StoreResult<()> {
        DetectionRow::upsert(&self.pool, detection)
            .await
            .map_err(store_error)
    }

    async fn upsert_samples(&self, samples: &[Sample]) -> StoreResult<()> {
        let affected = SampleRow::upsert_many(&self.pool, samples)
            .await
            .map_err(store_error)?;
        tracing::debug!("Mirrored {} samples", affected);
        Ok(())
    }

    async fn recent_detections(&self, limit: usize) -> StoreResult<Vec<Detection>> {
        let rows = DetectionRow::list_recent(&self.pool, limit as i64)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(DetectionRow::into_detection).collect())
    }

    fn stream_detections(&self, limit: usize) -> BoxStream<'_, StoreResult<Detection>> {
        DetectionRow::stream_recent(&self.pool, limit as i64)
            .map(|row| row.map(DetectionRow::into_detection).map_err(store_error))
            .boxed()
    }
}

/// Pick the configured store. An unreachable database degrades to the
/// no-op store rather than failing startup.
pub async fn connect(config: &Config) -> Arc<dyn DetectionStore> {
    match config.store {
        StoreKind::None => {
            tracing::info!("Persistence disabled");
            Arc::new(NoopStore)
        }
        StoreKind::Memory => {
            tracing::info!("Using in-memory detection store");
            Arc::new(InMemoryStore::new())
        }
        StoreKind::Postgres => match config.database_url.as_deref() {
            None => {
                tracing::warn!("DATABASE_URL not set, detections will not be persisted");
                Arc::new(NoopStore)
            }
            Some(url) => match connect_postgres(url).await {
                Ok(pool) => {
                    tracing::info!("Database: {}", config.database_host().unwrap_or("***"));
                    Arc::new(PgDetectionStore::new(pool))
                }
                Err(e) => {
                    tracing::warn!("Database unavailable, continuing without persistence: {}", e);
                    Arc::new(NoopStore)
                }
            },
        },
    }
}

async fn connect_postgres(url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = db::create_pool(url).await?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_without_database_url_is_noop() {
        let config = Config {
            store: StoreKind::Postgres,
            database_url: None,
            ..Config::default()
        };
        assert!(!connect(&config).await.is_available());
    }

    #[tokio::test]
    async fn test_connect_memory_store() {
        let config = Config {
            store: StoreKind::Memory,
            ..Config::default()
        };
        assert!(connect(&config).await.is_available());
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(store_error(sqlx::Error::RowNotFound), StoreError::Database(_)));
        assert!(matches!(
            store_error(sqlx::Error::Decode("bad payload".into())),
            StoreError::Decode(_)
        ));
    }
}
