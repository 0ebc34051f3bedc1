//! Event-driven readiness broadcast fan-out.
//!
//! [`ReadinessBroadcaster`] subscribes to the platform event bus and turns
//! mutation events into per-unit readiness pushes. Mutation handlers only
//! publish events; fan-out latency and per-subscriber failures never reach
//! them.

use std::sync::Arc;

use tokio::sync::broadcast;
use unitwatch_core::CoreError;
use unitwatch_events::bus::{EVENT_ASSIGNMENT_CREATED, EVENT_EXPIRY_SCAN_COMPLETED};
use unitwatch_events::DomainEvent;

use crate::services::ReadinessService;
use crate::ws::handler::readiness_message;
use crate::ws::ReadinessWsManager;

/// Routes mutation events to readiness broadcasts.
pub struct ReadinessBroadcaster {
    ws_manager: Arc<ReadinessWsManager>,
    readiness: Arc<ReadinessService>,
}

impl ReadinessBroadcaster {
    /// Create a broadcaster over the given subscription manager and query
    /// service.
    pub fn new(ws_manager: Arc<ReadinessWsManager>, readiness: Arc<ReadinessService>) -> Self {
        Self {
            ws_manager,
            readiness,
        }
    }

    /// Run the main broadcast loop.
    ///
    /// Consumes events from the bus via `receiver` and exits when the
    /// channel is closed (i.e. the
    /// [`EventBus`](unitwatch_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.handle_event(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Readiness broadcaster lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, readiness broadcaster shutting down");
                    break;
                }
            }
        }
    }

    /// Map one event to the units whose readiness it may have changed.
    async fn handle_event(&self, event: &DomainEvent) {
        match event.event_type.as_str() {
            EVENT_ASSIGNMENT_CREATED => {
                if let Some(unit_id) = &event.source_entity_id {
                    self.broadcast_unit(unit_id).await;
                }
            }
            EVENT_EXPIRY_SCAN_COMPLETED => {
                let unit_ids: Vec<String> = event
                    .payload
                    .get("affected_unit_ids")
                    .and_then(|v| serde_json::from_value(v.clone()).ok())
                    .unwrap_or_default();
                // Broadcasts are unconditional on the trigger, not diffed
                // against previous readiness.
                for unit_id in unit_ids {
                    self.broadcast_unit(&unit_id).await;
                }
            }
            _ => {}
        }
    }

    /// Recompute readiness for one unit and push it to every subscriber.
    ///
    /// A unit nobody watches costs nothing: the subscriber check happens
    /// before any readiness computation.
    pub async fn broadcast_unit(&self, unit_id: &str) {
        if !self.ws_manager.has_subscribers(unit_id).await {
            tracing::debug!(unit_id, "No subscribers, skipping readiness broadcast");
            return;
        }

        let report = match self.readiness.get_unit_readiness(unit_id).await {
            Ok(report) => report,
            Err(CoreError::NotFound { .. }) => {
                tracing::debug!(unit_id, "Unit vanished before broadcast");
                return;
            }
            Err(e) => {
                tracing::error!(unit_id, error = %e, "Readiness computation failed, broadcast dropped");
                return;
            }
        };

        let delivered = self
            .ws_manager
            .broadcast_to_unit(unit_id, readiness_message(&report))
            .await;
        tracing::debug!(unit_id, delivered, "Broadcast readiness update");
    }
}
