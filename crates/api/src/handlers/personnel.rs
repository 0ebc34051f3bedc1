//! Personnel registration and profile management.

use axum::extract::{Path, Query, State};
use axum::Json;
use unitwatch_core::personnel::{self, AvailabilityStatus, NewPersonnel, Personnel};
use unitwatch_events::bus::EVENT_PERSONNEL_CREATED;
use unitwatch_events::DomainEvent;
use unitwatch_store::repositories::PersonnelRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for listing personnel.
#[derive(Debug, serde::Deserialize)]
pub struct PersonnelListParams {
    pub availability_status: Option<AvailabilityStatus>,
}

/// POST /api/personnel
///
/// Register a new personnel profile. The id is assigned here; a missing
/// `last_check_in` defaults to now.
pub async fn create_personnel(
    State(state): State<AppState>,
    Json(input): Json<NewPersonnel>,
) -> AppResult<Json<Personnel>> {
    personnel::validate_personnel(&input)?;

    let personnel_id = uuid::Uuid::new_v4().to_string();
    let mut person = input.into_personnel(personnel_id.clone());
    person.last_check_in = person.last_check_in.or_else(|| Some(chrono::Utc::now()));

    PersonnelRepo::put(&state.store, person.clone()).await?;
    state.analytics.ingest_personnel(&person).await;
    state.event_bus.publish(
        DomainEvent::new(EVENT_PERSONNEL_CREATED).with_source("personnel", personnel_id.clone()),
    );

    tracing::info!(personnel_id = %personnel_id, name = %person.name, "Personnel registered");
    Ok(Json(person))
}

/// GET /api/personnel
///
/// List personnel, optionally filtered by availability.
pub async fn list_personnel(
    State(state): State<AppState>,
    Query(params): Query<PersonnelListParams>,
) -> AppResult<Json<Vec<Personnel>>> {
    let people =
        PersonnelRepo::list_by_availability(&state.store, params.availability_status).await;
    Ok(Json(people))
}

/// GET /api/personnel/{personnel_id}
pub async fn get_personnel(
    State(state): State<AppState>,
    Path(personnel_id): Path<String>,
) -> AppResult<Json<Personnel>> {
    let person = PersonnelRepo::get(&state.store, &personnel_id).await?;
    Ok(Json(person))
}

/// PUT /api/personnel/{personnel_id}
///
/// Replace an existing profile. The stored `last_check_in` is preserved
/// when the payload omits it.
pub async fn update_personnel(
    State(state): State<AppState>,
    Path(personnel_id): Path<String>,
    Json(input): Json<NewPersonnel>,
) -> AppResult<Json<Personnel>> {
    personnel::validate_personnel(&input)?;

    let existing = PersonnelRepo::get(&state.store, &personnel_id).await?;
    let mut person = input.into_personnel(personnel_id.clone());
    person.last_check_in = person.last_check_in.or(existing.last_check_in);

    PersonnelRepo::put(&state.store, person.clone()).await?;
    state.analytics.ingest_personnel(&person).await;

    tracing::info!(personnel_id = %personnel_id, "Personnel updated");
    Ok(Json(person))
}
