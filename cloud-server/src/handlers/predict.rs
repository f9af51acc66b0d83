//! Forecast handler

use axum::{extract::{Query, State}, Json};
use solarwatch_core::Prediction;

use super::CountQuery;
use crate::AppState;

pub async fn predict(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Json<Prediction> {
    Json(state.pipeline.predict(query.count()))
}
