//! External catalog passthrough

use axum::{extract::{Query, State}, Json};
use serde::Deserialize;
use serde_json::Value;
use solarwatch_core::CatalogQuery;

use crate::{AppResult, AppState};

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// DONKI CME records for an optional `startDate`/`endDate` range
pub async fn donki(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<Value>> {
    let query = CatalogQuery::parse(params.start_date.as_deref(), params.end_date.as_deref())?;
    let records = state.catalog.cme_catalog(&query).await?;
    Ok(Json(records))
}
