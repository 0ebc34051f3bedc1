//! Response unit management.

use axum::extract::{Path, Query, State};
use axum::Json;
use unitwatch_core::unit::{self, NewUnit, Unit, UnitType};
use unitwatch_events::bus::EVENT_UNIT_CREATED;
use unitwatch_events::DomainEvent;
use unitwatch_store::repositories::UnitRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for listing units.
#[derive(Debug, serde::Deserialize)]
pub struct UnitListParams {
    pub unit_type: Option<UnitType>,
}

/// POST /api/units
pub async fn create_unit(
    State(state): State<AppState>,
    Json(input): Json<NewUnit>,
) -> AppResult<Json<Unit>> {
    unit::validate_unit(&input)?;

    let unit_id = uuid::Uuid::new_v4().to_string();
    let created = input.into_unit(unit_id.clone());

    UnitRepo::put(&state.store, created.clone()).await?;
    state.analytics.ingest_unit(&created).await;
    state
        .event_bus
        .publish(DomainEvent::new(EVENT_UNIT_CREATED).with_source("unit", unit_id.clone()));

    tracing::info!(unit_id = %unit_id, unit_name = %created.unit_name, "Unit created");
    Ok(Json(created))
}

/// GET /api/units
///
/// List units, optionally filtered by type.
pub async fn list_units(
    State(state): State<AppState>,
    Query(params): Query<UnitListParams>,
) -> AppResult<Json<Vec<Unit>>> {
    let units = UnitRepo::list_by_type(&state.store, params.unit_type).await;
    Ok(Json(units))
}

/// GET /api/units/{unit_id}
pub async fn get_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
) -> AppResult<Json<Unit>> {
    let unit = UnitRepo::get(&state.store, &unit_id).await?;
    Ok(Json(unit))
}

/// PUT /api/units/{unit_id}
pub async fn update_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
    Json(input): Json<NewUnit>,
) -> AppResult<Json<Unit>> {
    unit::validate_unit(&input)?;

    if !UnitRepo::exists(&state.store, &unit_id).await {
        return Err(unitwatch_core::CoreError::NotFound {
            entity: "Unit",
            id: unit_id,
        }
        .into());
    }

    let updated = input.into_unit(unit_id.clone());
    UnitRepo::put(&state.store, updated.clone()).await?;
    state.analytics.ingest_unit(&updated).await;

    tracing::info!(unit_id = %unit_id, "Unit updated");
    Ok(Json(updated))
}
