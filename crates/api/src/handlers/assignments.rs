//! Shift assignment management.

use axum::extract::{Query, State};
use axum::Json;
use unitwatch_core::assignment::{self, NewUnitAssignment, UnitAssignment};
use unitwatch_core::personnel::AvailabilityStatus;
use unitwatch_events::bus::EVENT_ASSIGNMENT_CREATED;
use unitwatch_events::DomainEvent;
use unitwatch_store::repositories::{AssignmentRepo, PersonnelRepo, UnitRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for listing assignments.
#[derive(Debug, serde::Deserialize)]
pub struct AssignmentListParams {
    pub unit_id: Option<String>,
    pub personnel_id: Option<String>,
}

/// POST /api/unit-assignments
///
/// Attach a person to a unit for a shift window. The person must hold
/// every certification the unit requires; on success they are marked
/// DEPLOYED with the unit as their current back-reference, and an
/// `assignment.created` event triggers the readiness broadcast for the
/// unit.
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(input): Json<NewUnitAssignment>,
) -> AppResult<Json<UnitAssignment>> {
    assignment::validate_shift_window(&input)?;

    let unit = UnitRepo::get(&state.store, &input.unit_id).await?;
    let mut person = PersonnelRepo::get(&state.store, &input.personnel_id).await?;

    let missing_required: Vec<&String> = unit
        .required_certifications
        .iter()
        .filter(|req| !person.certifications.contains(*req))
        .collect();
    if !missing_required.is_empty() {
        let joined = missing_required
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::BadRequest(format!(
            "Personnel missing required certifications: {joined}"
        )));
    }

    let assignment_id = uuid::Uuid::new_v4().to_string();
    let created = input.into_assignment(assignment_id.clone());
    AssignmentRepo::put(&state.store, created.clone()).await?;

    // The assignment deploys the person to this unit.
    person.current_unit_id = Some(unit.unit_id.clone());
    person.availability_status = AvailabilityStatus::Deployed;
    PersonnelRepo::put(&state.store, person.clone()).await?;

    state.analytics.ingest_assignment(&created).await;
    state.analytics.ingest_personnel(&person).await;

    state.event_bus.publish(
        DomainEvent::new(EVENT_ASSIGNMENT_CREATED)
            .with_source("unit", unit.unit_id.clone())
            .with_payload(serde_json::json!({
                "assignment_id": assignment_id,
                "personnel_id": created.personnel_id,
            })),
    );

    tracing::info!(
        assignment_id = %assignment_id,
        unit_id = %unit.unit_id,
        personnel_id = %created.personnel_id,
        "Assignment created"
    );
    Ok(Json(created))
}

/// GET /api/unit-assignments
///
/// List assignments with optional unit/personnel filtering.
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(params): Query<AssignmentListParams>,
) -> AppResult<Json<Vec<UnitAssignment>>> {
    let assignments = AssignmentRepo::list_filtered(
        &state.store,
        params.unit_id.as_deref(),
        params.personnel_id.as_deref(),
    )
    .await;
    Ok(Json(assignments))
}
