//! Sample buffer handlers

use axum::{extract::{Query, State}, Json};
use solarwatch_core::{BufferStatus, IngestReport, LatestSnapshot};

use super::CountQuery;
use crate::{AppResult, AppState};

/// Last `n` merged samples with speed and Bz forecasts
pub async fn latest(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Json<LatestSnapshot> {
    Json(state.pipeline.latest(query.count()))
}

pub async fn buffer(State(state): State<AppState>) -> Json<BufferStatus> {
    Json(state.pipeline.buffer_status())
}

/// Poll the upstream feed now instead of waiting for the next tick
pub async fn ingest(State(state): State<AppState>) -> AppResult<Json<IngestReport>> {
    let report = state.pipeline.poll(state.source.as_ref()).await?;
    Ok(Json(report))
}
