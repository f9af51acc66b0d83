//! Detection model

use futures::stream::BoxStream;
use sqlx::{types::Json, FromRow, PgPool};

use solarwatch_core::Detection;

/// Stored detection. The typed columns exist for indexing; `payload` holds
/// the full record and is all that is read back.
#[derive(Debug, Clone, FromRow)]
pub struct DetectionRow {
    pub payload: Json<Detection>,
}

impl DetectionRow {
    pub fn into_detection(self) -> Detection {
        self.payload.0
    }

    pub async fn upsert(pool: &PgPool, detection: &Detection) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO detections (id, time, speed, density, bz, score, severity_label, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                score = EXCLUDED.score,
                severity_label = EXCLUDED.severity_label,
                payload = EXCLUDED.payload,
                updated_at = NOW()
            "#
        )
        .bind(&detection.id)
        .bind(detection.time.as_str())
        .bind(detection.speed)
        .bind(detection.density)
        .bind(detection.bz)
        .bind(detection.score)
        .bind(detection.severity_label.as_str())
        .bind(Json(detection))
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DetectionRow>(LIST_RECENT_SQL)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Row cursor, newest first. Dropping the stream releases the connection.
    pub fn stream_recent(pool: &PgPool, limit: i64) -> BoxStream<'_, Result<Self, sqlx::Error>> {
        sqlx::query_as::<_, DetectionRow>(LIST_RECENT_SQL)
            .bind(limit)
            .fetch(pool)
    }
}

const LIST_RECENT_SQL: &str = r#"
    SELECT payload FROM detections
    ORDER BY time DESC, id DESC
    LIMIT $1
"#;
