use unitwatch_core::certification::Certification;
use unitwatch_core::CoreError;

use crate::Store;

/// Data access for the certification catalog.
pub struct CertificationRepo;

impl CertificationRepo {
    pub async fn get(store: &Store, id: &str) -> Result<Certification, CoreError> {
        store
            .certifications
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Certification",
                id: id.to_string(),
            })
    }

    pub async fn put(store: &Store, cert: Certification) -> Result<(), CoreError> {
        store
            .certifications
            .write()
            .await
            .insert(cert.certification_id.clone(), cert);
        Ok(())
    }

    /// List definitions, optionally filtered by category.
    pub async fn list_by_category(store: &Store, category: Option<&str>) -> Vec<Certification> {
        store
            .certifications
            .read()
            .await
            .values()
            .filter(|c| category.is_none_or(|cat| c.category.as_deref() == Some(cat)))
            .cloned()
            .collect()
    }

    /// Delete a definition. Fails with `NotFound` when absent.
    pub async fn delete(store: &Store, id: &str) -> Result<(), CoreError> {
        store
            .certifications
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(CoreError::NotFound {
                entity: "Certification",
                id: id.to_string(),
            })
    }
}
