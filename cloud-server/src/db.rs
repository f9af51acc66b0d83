//! Database module - PostgreSQL connection and migrations

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Create database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create tables if not exist
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Detections (one row per candidate, keyed by "<time>_<speed>")
CREATE TABLE IF NOT EXISTS detections (
    id VARCHAR(64) PRIMARY KEY,
    time VARCHAR(32) NOT NULL,
    speed DOUBLE PRECISION NOT NULL,
    density DOUBLE PRECISION NOT NULL,
    bz DOUBLE PRECISION NOT NULL,
    score DOUBLE PRECISION NOT NULL,
    severity_label VARCHAR(20) NOT NULL,
    payload JSONB NOT NULL,
    created_at TIMESTAMPTZ DEFAULT NOW(),
    updated_at TIMESTAMPTZ DEFAULT NOW()
);

-- Raw merged samples
CREATE TABLE IF NOT EXISTS samples (
    time VARCHAR(32) PRIMARY KEY,
    density DOUBLE PRECISION,
    speed DOUBLE PRECISION,
    temperature DOUBLE PRECISION,
    bx_gsm DOUBLE PRECISION,
    by_gsm DOUBLE PRECISION,
    bz_gsm DOUBLE PRECISION,
    recorded_at TIMESTAMPTZ DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_detections_time ON detections(time DESC);
CREATE INDEX IF NOT EXISTS idx_detections_severity ON detections(severity_label);
"#;
