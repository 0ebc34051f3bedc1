//! WebSocket infrastructure for live readiness updates.
//!
//! Provides the per-unit subscription manager, the readiness broadcaster,
//! heartbeat monitoring, and the HTTP upgrade handler used by Axum routes.

mod broadcaster;
mod handler;
mod heartbeat;
pub mod manager;

pub use broadcaster::ReadinessBroadcaster;
pub use handler::{readiness_message, unit_readiness_ws};
pub use heartbeat::start_heartbeat;
pub use manager::ReadinessWsManager;
