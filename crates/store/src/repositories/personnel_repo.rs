use unitwatch_core::personnel::{AvailabilityStatus, Personnel};
use unitwatch_core::CoreError;

use crate::Store;

/// Data access for personnel records.
pub struct PersonnelRepo;

impl PersonnelRepo {
    /// Fetch a record, failing with `NotFound` when the id does not resolve.
    pub async fn get(store: &Store, id: &str) -> Result<Personnel, CoreError> {
        store
            .personnel
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Personnel",
                id: id.to_string(),
            })
    }

    /// Fetch a record if it exists.
    pub async fn find(store: &Store, id: &str) -> Option<Personnel> {
        store.personnel.read().await.get(id).cloned()
    }

    /// Snapshot every record.
    pub async fn all(store: &Store) -> Vec<Personnel> {
        store.personnel.read().await.values().cloned().collect()
    }

    /// Insert or replace a record keyed by its id.
    pub async fn put(store: &Store, person: Personnel) -> Result<(), CoreError> {
        store
            .personnel
            .write()
            .await
            .insert(person.personnel_id.clone(), person);
        Ok(())
    }

    /// List records, optionally filtered by availability.
    pub async fn list_by_availability(
        store: &Store,
        availability: Option<AvailabilityStatus>,
    ) -> Vec<Personnel> {
        store
            .personnel
            .read()
            .await
            .values()
            .filter(|p| availability.is_none_or(|a| p.availability_status == a))
            .cloned()
            .collect()
    }

    /// Atomically update one person's availability and note.
    ///
    /// Both fields change under a single write-lock critical section, so no
    /// reader can observe the note without the status change.
    pub async fn update_availability(
        store: &Store,
        id: &str,
        availability: AvailabilityStatus,
        note: Option<String>,
    ) -> Result<(), CoreError> {
        let mut table = store.personnel.write().await;
        let person = table.get_mut(id).ok_or(CoreError::NotFound {
            entity: "Personnel",
            id: id.to_string(),
        })?;
        person.availability_status = availability;
        person.notes = note;
        Ok(())
    }

    /// Whether an id resolves to a stored record.
    pub async fn exists(store: &Store, id: &str) -> bool {
        store.personnel.read().await.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn person(id: &str, availability: AvailabilityStatus) -> Personnel {
        Personnel {
            personnel_id: id.into(),
            name: "Alvarez".into(),
            rank: None,
            role: "Firefighter".into(),
            certifications: vec![],
            cert_expirations: BTreeMap::new(),
            availability_status: availability,
            last_check_in: None,
            station_id: None,
            current_unit_id: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = Store::new();
        let err = PersonnelRepo::get(&store, "p-404").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "Personnel", .. }));
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = Store::new();
        PersonnelRepo::put(&store, person("p-1", AvailabilityStatus::Available))
            .await
            .unwrap();

        let fetched = PersonnelRepo::get(&store, "p-1").await.unwrap();
        assert_eq!(fetched.name, "Alvarez");
    }

    #[tokio::test]
    async fn availability_filter_applies() {
        let store = Store::new();
        PersonnelRepo::put(&store, person("p-1", AvailabilityStatus::Available))
            .await
            .unwrap();
        PersonnelRepo::put(&store, person("p-2", AvailabilityStatus::Off))
            .await
            .unwrap();

        let off =
            PersonnelRepo::list_by_availability(&store, Some(AvailabilityStatus::Off)).await;
        assert_eq!(off.len(), 1);
        assert_eq!(off[0].personnel_id, "p-2");

        let everyone = PersonnelRepo::list_by_availability(&store, None).await;
        assert_eq!(everyone.len(), 2);
    }

    #[tokio::test]
    async fn update_availability_sets_status_and_note_together() {
        let store = Store::new();
        PersonnelRepo::put(&store, person("p-1", AvailabilityStatus::Deployed))
            .await
            .unwrap();

        PersonnelRepo::update_availability(
            &store,
            "p-1",
            AvailabilityStatus::Off,
            Some("Unqualified: Expired certifications: EMT-B".into()),
        )
        .await
        .unwrap();

        let fetched = PersonnelRepo::get(&store, "p-1").await.unwrap();
        assert_eq!(fetched.availability_status, AvailabilityStatus::Off);
        assert_eq!(
            fetched.notes.as_deref(),
            Some("Unqualified: Expired certifications: EMT-B")
        );
    }

    #[tokio::test]
    async fn update_availability_missing_is_not_found() {
        let store = Store::new();
        let err =
            PersonnelRepo::update_availability(&store, "p-404", AvailabilityStatus::Off, None)
                .await
                .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
