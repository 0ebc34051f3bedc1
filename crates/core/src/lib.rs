//! Pure domain logic for the unitwatch readiness platform.
//!
//! This crate holds the entity types, their validation rules, and the
//! decision logic of the system: the readiness calculator and the
//! certification-expiry classification. It performs no I/O; evaluation is
//! done against pre-loaded data passed in by the caller, together with an
//! explicit `now` so results are deterministic and testable.

pub mod assignment;
pub mod certification;
pub mod error;
pub mod expiry;
pub mod personnel;
pub mod readiness;
pub mod types;
pub mod unit;

pub use error::CoreError;
