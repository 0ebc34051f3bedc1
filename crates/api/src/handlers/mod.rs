//! HTTP handlers for the `/api` surface.

pub mod assignments;
pub mod certifications;
pub mod personnel;
pub mod readiness;
pub mod units;
