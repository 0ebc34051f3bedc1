//! Root-level service banner and health check.

use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

/// Build the root-level health routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

/// GET /
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Unitwatch Readiness API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
