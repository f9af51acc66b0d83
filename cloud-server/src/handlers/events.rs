//! Detection handlers

use axum::{extract::{Path, State}, Json};
use solarwatch_core::{AlertStatus, DetectOutcome, Detection};

use crate::{AppError, AppResult, AppState};

/// Retained detection log, oldest first
pub async fn list(State(state): State<AppState>) -> Json<Vec<Detection>> {
    Json(state.pipeline.events())
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Detection>> {
    let detection = state
        .pipeline
        .event(&id)
        .ok_or_else(|| AppError::NotFound("Detection not found".to_string()))?;

    Ok(Json(detection))
}

/// Force a rescan of the buffer
pub async fn detect(State(state): State<AppState>) -> Json<DetectOutcome> {
    Json(state.pipeline.detect().await)
}

pub async fn alerts(State(state): State<AppState>) -> Json<AlertStatus> {
    Json(state.pipeline.alert())
}
