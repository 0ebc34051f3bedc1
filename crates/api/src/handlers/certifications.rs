//! Certification expiry endpoints and catalog management.

use axum::extract::{Path, Query, State};
use axum::Json;
use unitwatch_core::certification::{self, Certification, NewCertification};
use unitwatch_core::expiry::{ExpiredCertification, ExpiringCertification};
use unitwatch_events::bus::EVENT_EXPIRY_SCAN_COMPLETED;
use unitwatch_events::DomainEvent;
use unitwatch_store::repositories::CertificationRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for the expiring-certifications listing.
#[derive(Debug, serde::Deserialize)]
pub struct ExpiringParams {
    /// Number of days to look ahead.
    pub days_ahead: Option<i64>,
}

/// Query parameters for the catalog listing.
#[derive(Debug, serde::Deserialize)]
pub struct CatalogListParams {
    pub category: Option<String>,
}

const DEFAULT_LOOKAHEAD_DAYS: i64 = 30;

/// GET /api/certifications/expiring
pub async fn expiring_certifications(
    State(state): State<AppState>,
    Query(params): Query<ExpiringParams>,
) -> AppResult<Json<Vec<ExpiringCertification>>> {
    let days_ahead = params.days_ahead.unwrap_or(DEFAULT_LOOKAHEAD_DAYS);
    Ok(Json(state.certifications.list_expiring(days_ahead).await))
}

/// GET /api/certifications/expired
pub async fn expired_certifications(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ExpiredCertification>>> {
    Ok(Json(state.certifications.list_expired().await))
}

/// POST /api/certifications/check-expirations
///
/// Run the expiry scan: mark personnel with expired certifications as
/// unqualified, then publish `expiry_scan.completed` so readiness is
/// re-broadcast for every unit with an on-shift crew. Typically driven by
/// a daily scheduler.
pub async fn check_and_mark_expired(
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let outcome = state.certifications.run_expiry_scan().await;

    state.event_bus.publish(
        DomainEvent::new(EVENT_EXPIRY_SCAN_COMPLETED).with_payload(serde_json::json!({
            "affected_unit_ids": outcome.affected_unit_ids,
            "marked_unqualified": outcome.marked_unqualified,
        })),
    );

    tracing::info!(
        marked = outcome.marked_unqualified,
        affected_units = outcome.affected_unit_ids.len(),
        "Expiry scan completed"
    );

    Ok(Json(serde_json::json!({
        "marked_unqualified": outcome.marked_unqualified,
        "affected_units": outcome.affected_unit_ids,
        "message": format!(
            "Marked {} personnel as unqualified due to expired certifications",
            outcome.marked_unqualified
        ),
    })))
}

// ---------------------------------------------------------------------------
// Catalog CRUD
// ---------------------------------------------------------------------------

/// POST /api/certifications
pub async fn create_certification(
    State(state): State<AppState>,
    Json(input): Json<NewCertification>,
) -> AppResult<Json<Certification>> {
    certification::validate_certification(&input)?;

    let certification_id = uuid::Uuid::new_v4().to_string();
    let created = input.into_certification(certification_id.clone(), chrono::Utc::now());
    CertificationRepo::put(&state.store, created.clone()).await?;

    tracing::info!(certification_id = %certification_id, name = %created.name, "Certification created");
    Ok(Json(created))
}

/// GET /api/certifications
pub async fn list_certifications(
    State(state): State<AppState>,
    Query(params): Query<CatalogListParams>,
) -> AppResult<Json<Vec<Certification>>> {
    let certs = CertificationRepo::list_by_category(&state.store, params.category.as_deref()).await;
    Ok(Json(certs))
}

/// GET /api/certifications/{certification_id}
pub async fn get_certification(
    State(state): State<AppState>,
    Path(certification_id): Path<String>,
) -> AppResult<Json<Certification>> {
    let cert = CertificationRepo::get(&state.store, &certification_id).await?;
    Ok(Json(cert))
}

/// PUT /api/certifications/{certification_id}
pub async fn update_certification(
    State(state): State<AppState>,
    Path(certification_id): Path<String>,
    Json(input): Json<NewCertification>,
) -> AppResult<Json<Certification>> {
    certification::validate_certification(&input)?;

    let existing = CertificationRepo::get(&state.store, &certification_id).await?;
    let mut updated = input.into_certification(certification_id.clone(), chrono::Utc::now());
    updated.created_at = existing.created_at;
    CertificationRepo::put(&state.store, updated.clone()).await?;

    tracing::info!(certification_id = %certification_id, "Certification updated");
    Ok(Json(updated))
}

/// DELETE /api/certifications/{certification_id}
pub async fn delete_certification(
    State(state): State<AppState>,
    Path(certification_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    CertificationRepo::delete(&state.store, &certification_id).await?;
    tracing::info!(certification_id = %certification_id, "Certification deleted");
    Ok(Json(serde_json::json!({
        "message": "Certification deleted successfully"
    })))
}
