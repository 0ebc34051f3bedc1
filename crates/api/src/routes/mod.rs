pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /personnel                                   create (POST), list (GET)
/// /personnel/{id}                              get, update (PUT)
///
/// /units                                       create (POST), list (GET)
/// /units/{id}                                  get, update (PUT)
///
/// /unit-assignments                            assign (POST), list (GET)
///
/// /readiness/units                             all-units readiness (GET)
/// /readiness/units/{id}                        unit readiness (GET)
/// /readiness/units/{id}/history                readiness history (GET)
///
/// /certifications/expiring                     expiring within lookahead (GET)
/// /certifications/expired                      currently expired (GET)
/// /certifications/check-expirations            expiry scan (POST)
/// /certifications                              create (POST), list (GET)
/// /certifications/{id}                         get, update (PUT), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // -- Personnel --
        .route(
            "/personnel",
            post(handlers::personnel::create_personnel).get(handlers::personnel::list_personnel),
        )
        .route(
            "/personnel/{personnel_id}",
            get(handlers::personnel::get_personnel).put(handlers::personnel::update_personnel),
        )
        // -- Units --
        .route(
            "/units",
            post(handlers::units::create_unit).get(handlers::units::list_units),
        )
        .route(
            "/units/{unit_id}",
            get(handlers::units::get_unit).put(handlers::units::update_unit),
        )
        // -- Assignments --
        .route(
            "/unit-assignments",
            post(handlers::assignments::create_assignment)
                .get(handlers::assignments::list_assignments),
        )
        // -- Readiness --
        .route(
            "/readiness/units",
            get(handlers::readiness::all_units_readiness),
        )
        .route(
            "/readiness/units/{unit_id}",
            get(handlers::readiness::unit_readiness),
        )
        .route(
            "/readiness/units/{unit_id}/history",
            get(handlers::readiness::unit_readiness_history),
        )
        // -- Certifications --
        .route(
            "/certifications/expiring",
            get(handlers::certifications::expiring_certifications),
        )
        .route(
            "/certifications/expired",
            get(handlers::certifications::expired_certifications),
        )
        .route(
            "/certifications/check-expirations",
            post(handlers::certifications::check_and_mark_expired),
        )
        .route(
            "/certifications",
            post(handlers::certifications::create_certification)
                .get(handlers::certifications::list_certifications),
        )
        .route(
            "/certifications/{certification_id}",
            get(handlers::certifications::get_certification)
                .put(handlers::certifications::update_certification)
                .delete(handlers::certifications::delete_certification),
        )
}

/// Build the root-level routes: health endpoints and the readiness
/// WebSocket.
pub fn root_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .route("/ws/unit-readiness/{unit_id}", get(ws::unit_readiness_ws))
}
