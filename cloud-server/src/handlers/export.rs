//! Detection export handler
//!
//! CSV is streamed row by row from the store cursor; closing the connection
//! stops the producer and releases the cursor.

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use solarwatch_core::ExportFormat;

use super::lenient_int;
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct ExportQuery {
    pub format: Option<String>,
    pub limit: Option<String>,
}

pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let format = ExportFormat::parse_or_default(query.format.as_deref());
    let limit = lenient_int(query.limit.as_deref());
    let disposition = format!("attachment; filename=\"{}\"", format.file_name());

    tracing::debug!("Export requested: {:?}, limit {:?}", format, limit);

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    match format {
        ExportFormat::Csv => {
            let body = Body::from_stream(state.pipeline.export_csv(limit));
            (headers, body).into_response()
        }
        ExportFormat::Json => {
            let detections = state.pipeline.export_json(limit).await;
            (headers, Json(detections)).into_response()
        }
    }
}
