//! Unitwatch event bus and analytics infrastructure.
//!
//! This crate provides the collaborators the readiness core talks to
//! without knowing their backends:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. Mutation handlers publish lifecycle
//!   events; the readiness broadcaster consumes them independently.
//! - [`DomainEvent`] — the canonical event envelope.
//! - [`AnalyticsSink`] — capability interface for warehouse ingestion and
//!   readiness-history queries, selected once at startup.

pub mod analytics;
pub mod bus;

pub use analytics::{AnalyticsSink, MemoryAnalyticsSink, NoopAnalyticsSink, ReadinessSample};
pub use bus::{DomainEvent, EventBus};
