use std::collections::HashMap;

use tokio::sync::RwLock;
use unitwatch_core::assignment::UnitAssignment;
use unitwatch_core::certification::Certification;
use unitwatch_core::personnel::Personnel;
use unitwatch_core::types::EntityId;
use unitwatch_core::unit::Unit;

/// Owner of all entity tables.
///
/// Thread-safe via interior `RwLock`s; designed to be wrapped in `Arc` and
/// shared across the application. Each table is locked independently, so
/// readiness reads over assignments do not contend with certification
/// catalog writes.
pub struct Store {
    pub(crate) personnel: RwLock<HashMap<EntityId, Personnel>>,
    pub(crate) units: RwLock<HashMap<EntityId, Unit>>,
    pub(crate) assignments: RwLock<HashMap<EntityId, UnitAssignment>>,
    pub(crate) certifications: RwLock<HashMap<EntityId, Certification>>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            personnel: RwLock::new(HashMap::new()),
            units: RwLock::new(HashMap::new()),
            assignments: RwLock::new(HashMap::new()),
            certifications: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
