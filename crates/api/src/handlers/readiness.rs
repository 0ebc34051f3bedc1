//! Readiness query endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use unitwatch_core::readiness::ReadinessReport;

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for readiness history.
#[derive(Debug, serde::Deserialize)]
pub struct HistoryParams {
    /// Number of trailing days of history to retrieve.
    pub days: Option<i64>,
}

const DEFAULT_HISTORY_DAYS: i64 = 7;

/// GET /api/readiness/units
///
/// Current readiness for every known unit.
pub async fn all_units_readiness(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReadinessReport>>> {
    Ok(Json(state.readiness.check_all_units().await))
}

/// GET /api/readiness/units/{unit_id}
pub async fn unit_readiness(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
) -> AppResult<Json<ReadinessReport>> {
    let report = state.readiness.get_unit_readiness(&unit_id).await?;
    Ok(Json(report))
}

/// GET /api/readiness/units/{unit_id}/history
///
/// Historical readiness observations served by the analytics sink.
pub async fn unit_readiness_history(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<serde_json::Value>> {
    let days = params.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    let history = state.analytics.readiness_history(&unit_id, days).await;
    Ok(Json(serde_json::json!({
        "unit_id": unit_id,
        "days": days,
        "history": history,
    })))
}
