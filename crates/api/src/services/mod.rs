//! Application services layered over the repository.
//!
//! [`ReadinessService`] resolves the active crew for a unit and invokes
//! the pure calculator; [`CertificationService`] wraps the expiry
//! classification and owns the one durable side effect in the system
//! (marking personnel unqualified).

mod certification;
mod readiness;

pub use certification::{CertificationService, ExpiryScanOutcome};
pub use readiness::ReadinessService;
