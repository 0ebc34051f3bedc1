use std::collections::BTreeSet;

use unitwatch_core::assignment::{self, AssignmentStatus, UnitAssignment};
use unitwatch_core::types::{EntityId, Timestamp};
use unitwatch_core::CoreError;

use crate::Store;

/// Data access for unit assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert or replace an assignment keyed by its id.
    pub async fn put(store: &Store, assignment: UnitAssignment) -> Result<(), CoreError> {
        store
            .assignments
            .write()
            .await
            .insert(assignment.assignment_id.clone(), assignment);
        Ok(())
    }

    /// Snapshot every assignment.
    pub async fn all(store: &Store) -> Vec<UnitAssignment> {
        store.assignments.read().await.values().cloned().collect()
    }

    /// List assignments, optionally filtered by unit and/or personnel.
    pub async fn list_filtered(
        store: &Store,
        unit_id: Option<&str>,
        personnel_id: Option<&str>,
    ) -> Vec<UnitAssignment> {
        store
            .assignments
            .read()
            .await
            .values()
            .filter(|a| unit_id.is_none_or(|u| a.unit_id == u))
            .filter(|a| personnel_id.is_none_or(|p| a.personnel_id == p))
            .cloned()
            .collect()
    }

    /// The active set for a unit at `now`: ON_SHIFT and either currently
    /// inside the shift window or starting within today's UTC day.
    pub async fn active_for_unit(
        store: &Store,
        unit_id: &str,
        now: Timestamp,
    ) -> Vec<UnitAssignment> {
        store
            .assignments
            .read()
            .await
            .values()
            .filter(|a| a.unit_id == unit_id && assignment::is_active_at(a, now))
            .cloned()
            .collect()
    }

    /// Ids of every unit with at least one ON_SHIFT assignment. These are
    /// the units a completed expiry scan can affect.
    pub async fn units_with_on_shift(store: &Store) -> Vec<EntityId> {
        let table = store.assignments.read().await;
        let unit_ids: BTreeSet<EntityId> = table
            .values()
            .filter(|a| a.assignment_status == AssignmentStatus::OnShift)
            .map(|a| a.unit_id.clone())
            .collect();
        unit_ids.into_iter().collect()
    }
}
