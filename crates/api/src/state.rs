use std::sync::Arc;

use unitwatch_events::{AnalyticsSink, EventBus};
use unitwatch_store::Store;

use crate::config::ServerConfig;
use crate::services::{CertificationService, ReadinessService};
use crate::ws::ReadinessWsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// In-memory entity repository.
    pub store: Arc<Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Per-unit WebSocket subscription manager.
    pub ws_manager: Arc<ReadinessWsManager>,
    /// Centralized event bus for publishing lifecycle events.
    pub event_bus: Arc<EventBus>,
    /// Analytics sink selected at startup.
    pub analytics: Arc<dyn AnalyticsSink>,
    /// Readiness query service.
    pub readiness: Arc<ReadinessService>,
    /// Certification expiry scanner.
    pub certifications: Arc<CertificationService>,
}
