use unitwatch_core::types::EntityId;
use unitwatch_core::unit::{Unit, UnitType};
use unitwatch_core::CoreError;

use crate::Store;

/// Data access for response units.
pub struct UnitRepo;

impl UnitRepo {
    /// Fetch a unit, failing with `NotFound` when the id does not resolve.
    pub async fn get(store: &Store, id: &str) -> Result<Unit, CoreError> {
        store
            .units
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Unit",
                id: id.to_string(),
            })
    }

    /// Fetch a unit if it exists.
    pub async fn find(store: &Store, id: &str) -> Option<Unit> {
        store.units.read().await.get(id).cloned()
    }

    /// Snapshot every unit.
    pub async fn all(store: &Store) -> Vec<Unit> {
        store.units.read().await.values().cloned().collect()
    }

    /// Snapshot every unit id. Used by all-units readiness sweeps, which
    /// re-resolve each id and tolerate units deleted mid-iteration.
    pub async fn all_ids(store: &Store) -> Vec<EntityId> {
        store.units.read().await.keys().cloned().collect()
    }

    /// Insert or replace a unit keyed by its id.
    pub async fn put(store: &Store, unit: Unit) -> Result<(), CoreError> {
        store.units.write().await.insert(unit.unit_id.clone(), unit);
        Ok(())
    }

    /// List units, optionally filtered by type.
    pub async fn list_by_type(store: &Store, unit_type: Option<UnitType>) -> Vec<Unit> {
        store
            .units
            .read()
            .await
            .values()
            .filter(|u| unit_type.is_none_or(|t| u.unit_type == t))
            .cloned()
            .collect()
    }

    /// Whether an id resolves to a stored unit.
    pub async fn exists(store: &Store, id: &str) -> bool {
        store.units.read().await.contains_key(id)
    }
}
