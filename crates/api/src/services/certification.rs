use std::collections::HashMap;
use std::sync::Arc;

use unitwatch_core::expiry::{self, ExpiredCertification, ExpiringCertification};
use unitwatch_core::personnel::AvailabilityStatus;
use unitwatch_core::types::EntityId;
use unitwatch_store::repositories::{AssignmentRepo, PersonnelRepo};
use unitwatch_store::Store;

/// Result of a completed expiry scan.
#[derive(Debug, Clone)]
pub struct ExpiryScanOutcome {
    /// How many personnel were marked unqualified in this run.
    pub marked_unqualified: usize,
    /// Units with at least one ON_SHIFT assignment at scan time; these are
    /// the units whose readiness the scan can have changed.
    pub affected_unit_ids: Vec<EntityId>,
}

/// Certification expiry scanner.
///
/// Wraps the pure expiry classification over the repository and owns the
/// only durable side effect in the core: flipping personnel with expired
/// certifications to OFF.
pub struct CertificationService {
    store: Arc<Store>,
}

impl CertificationService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Certifications expiring within `days_ahead` days, expired ones
    /// included.
    pub async fn list_expiring(&self, days_ahead: i64) -> Vec<ExpiringCertification> {
        let personnel = PersonnelRepo::all(&self.store).await;
        expiry::list_expiring(&personnel, chrono::Utc::now(), days_ahead)
    }

    /// All currently-expired certifications.
    pub async fn list_expired(&self) -> Vec<ExpiredCertification> {
        let personnel = PersonnelRepo::all(&self.store).await;
        expiry::list_expired(&personnel, chrono::Utc::now())
    }

    /// Mark every person holding at least one expired certification as OFF.
    ///
    /// Each person's availability and note change atomically. A failed
    /// write is logged and excluded from the returned count, never counted
    /// as if it succeeded. Re-running with unchanged data re-detects and
    /// re-counts the same personnel.
    pub async fn mark_unqualified(&self) -> usize {
        let expired = self.list_expired().await;

        let mut by_person: HashMap<EntityId, Vec<String>> = HashMap::new();
        for item in expired {
            by_person
                .entry(item.personnel_id)
                .or_default()
                .push(item.certification);
        }

        let mut marked = 0;
        for (personnel_id, certs) in by_person {
            let note = format!("Unqualified: Expired certifications: {}", certs.join(", "));
            match PersonnelRepo::update_availability(
                &self.store,
                &personnel_id,
                AvailabilityStatus::Off,
                Some(note),
            )
            .await
            {
                Ok(()) => {
                    marked += 1;
                    tracing::warn!(
                        personnel_id = %personnel_id,
                        expired = %certs.join(", "),
                        "Marked personnel unqualified due to expired certifications"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        personnel_id = %personnel_id,
                        error = %e,
                        "Failed to persist unqualified status"
                    );
                }
            }
        }

        marked
    }

    /// Run a full scan: mark unqualified personnel and report which units
    /// are affected.
    pub async fn run_expiry_scan(&self) -> ExpiryScanOutcome {
        let marked_unqualified = self.mark_unqualified().await;
        let affected_unit_ids = AssignmentRepo::units_with_on_shift(&self.store).await;
        ExpiryScanOutcome {
            marked_unqualified,
            affected_unit_ids,
        }
    }
}
