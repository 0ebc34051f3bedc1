use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use unitwatch_core::readiness::{self, AssignedPersonnel, ReadinessReport};
use unitwatch_core::CoreError;
use unitwatch_events::AnalyticsSink;
use unitwatch_store::repositories::{AssignmentRepo, PersonnelRepo, UnitRepo};
use unitwatch_store::Store;

/// Readiness query service.
///
/// Resolves a unit's active assignments at the current instant, fetches
/// the crew, and invokes the calculator. Reports are recomputed on every
/// call; nothing is cached.
pub struct ReadinessService {
    store: Arc<Store>,
    analytics: Arc<dyn AnalyticsSink>,
    computed_total: AtomicU64,
}

impl ReadinessService {
    pub fn new(store: Arc<Store>, analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            store,
            analytics,
            computed_total: AtomicU64::new(0),
        }
    }

    /// Compute the current readiness report for one unit.
    ///
    /// Fails with `NotFound` when the unit id does not resolve.
    /// Assignments whose personnel id no longer resolves are skipped.
    pub async fn get_unit_readiness(&self, unit_id: &str) -> Result<ReadinessReport, CoreError> {
        let unit = UnitRepo::get(&self.store, unit_id).await?;
        let now = chrono::Utc::now();

        let active = AssignmentRepo::active_for_unit(&self.store, unit_id, now).await;

        let mut crew = Vec::with_capacity(active.len());
        for assignment in &active {
            match PersonnelRepo::find(&self.store, &assignment.personnel_id).await {
                Some(person) => crew.push(person),
                None => {
                    tracing::warn!(
                        assignment_id = %assignment.assignment_id,
                        personnel_id = %assignment.personnel_id,
                        "Assignment references missing personnel, skipping"
                    );
                }
            }
        }

        let breakdown = readiness::evaluate_unit(&unit, &crew, &active, now);
        self.computed_total.fetch_add(1, Ordering::Relaxed);

        let snapshot: Vec<AssignedPersonnel> = crew.iter().map(Into::into).collect();
        let report = ReadinessReport::assemble(&unit, breakdown, snapshot, now);

        // Fire-and-forget: the sink logs its own failures.
        self.analytics.ingest_report(&report).await;

        Ok(report)
    }

    /// Compute reports for every known unit.
    ///
    /// Units deleted between the id sweep and their lookup are skipped
    /// without erroring.
    pub async fn check_all_units(&self) -> Vec<ReadinessReport> {
        let mut reports = Vec::new();
        for unit_id in UnitRepo::all_ids(&self.store).await {
            match self.get_unit_readiness(&unit_id).await {
                Ok(report) => reports.push(report),
                Err(CoreError::NotFound { .. }) => continue,
                Err(e) => {
                    tracing::error!(unit_id = %unit_id, error = %e, "Readiness computation failed");
                }
            }
        }
        reports
    }

    /// Total number of readiness computations performed by this service.
    pub fn computed_total(&self) -> u64 {
        self.computed_total.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::BTreeMap;
    use unitwatch_core::assignment::{AssignmentStatus, UnitAssignment};
    use unitwatch_core::personnel::Personnel;
    use unitwatch_core::unit::{Unit, UnitType};
    use unitwatch_events::MemoryAnalyticsSink;

    fn service_with_store() -> (Arc<Store>, ReadinessService) {
        let store = Arc::new(Store::new());
        let service = ReadinessService::new(Arc::clone(&store), Arc::new(MemoryAnalyticsSink::new()));
        (store, service)
    }

    fn unit(id: &str, minimum_staff: u32, required: &[&str]) -> Unit {
        Unit {
            unit_id: id.into(),
            unit_name: format!("Unit {id}"),
            unit_type: UnitType::Medic,
            minimum_staff,
            required_certifications: required.iter().map(|s| s.to_string()).collect(),
            station_id: None,
        }
    }

    fn person(id: &str, certs: &[&str]) -> Personnel {
        Personnel {
            personnel_id: id.into(),
            name: format!("Person {id}"),
            rank: None,
            role: "Paramedic".into(),
            certifications: certs.iter().map(|s| s.to_string()).collect(),
            cert_expirations: BTreeMap::new(),
            availability_status: Default::default(),
            last_check_in: None,
            station_id: None,
            current_unit_id: None,
            notes: None,
        }
    }

    fn current_assignment(id: &str, unit_id: &str, personnel_id: &str) -> UnitAssignment {
        let now = chrono::Utc::now();
        UnitAssignment {
            assignment_id: id.into(),
            unit_id: unit_id.into(),
            personnel_id: personnel_id.into(),
            shift_start: now - Duration::hours(1),
            shift_end: now + Duration::hours(7),
            assignment_status: AssignmentStatus::OnShift,
        }
    }

    #[tokio::test]
    async fn unknown_unit_is_not_found() {
        let (_store, service) = service_with_store();
        let err = service.get_unit_readiness("u-404").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "Unit", .. }));
        assert_eq!(service.computed_total(), 0);
    }

    #[tokio::test]
    async fn report_reflects_active_crew() {
        let (store, service) = service_with_store();
        UnitRepo::put(&store, unit("u-1", 2, &["EMT-P"])).await.unwrap();
        PersonnelRepo::put(&store, person("p-1", &["EMT-P"])).await.unwrap();
        AssignmentRepo::put(&store, current_assignment("a-1", "u-1", "p-1"))
            .await
            .unwrap();

        let report = service.get_unit_readiness("u-1").await.unwrap();

        assert_eq!(report.unit_id, "u-1");
        assert_eq!(report.staff_present, 1);
        assert_eq!(report.staff_required, 2);
        assert!(report.certifications_missing.is_empty());
        assert!(report.is_understaffed);
        assert_eq!(report.assigned_personnel.len(), 1);
        assert_eq!(report.assigned_personnel[0].personnel_id, "p-1");
        assert_eq!(service.computed_total(), 1);
    }

    #[tokio::test]
    async fn dangling_personnel_reference_is_skipped() {
        let (store, service) = service_with_store();
        UnitRepo::put(&store, unit("u-1", 1, &[])).await.unwrap();
        AssignmentRepo::put(&store, current_assignment("a-1", "u-1", "p-ghost"))
            .await
            .unwrap();

        let report = service.get_unit_readiness("u-1").await.unwrap();

        // The assignment still counts toward staffing; the snapshot has
        // nobody to show for it.
        assert_eq!(report.staff_present, 1);
        assert!(report.assigned_personnel.is_empty());
    }

    #[tokio::test]
    async fn check_all_units_reports_each_unit() {
        let (store, service) = service_with_store();
        UnitRepo::put(&store, unit("u-1", 1, &[])).await.unwrap();
        UnitRepo::put(&store, unit("u-2", 3, &[])).await.unwrap();

        let reports = service.check_all_units().await;

        assert_eq!(reports.len(), 2);
        let mut ids: Vec<_> = reports.iter().map(|r| r.unit_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["u-1", "u-2"]);
    }

    #[tokio::test]
    async fn reports_are_ingested_into_analytics() {
        let store = Arc::new(Store::new());
        let sink = Arc::new(MemoryAnalyticsSink::new());
        let service = ReadinessService::new(Arc::clone(&store), Arc::clone(&sink) as Arc<dyn AnalyticsSink>);
        UnitRepo::put(&store, unit("u-1", 1, &[])).await.unwrap();

        service.get_unit_readiness("u-1").await.unwrap();

        assert_eq!(sink.counters().await.reports, 1);
        assert_eq!(sink.readiness_history("u-1", 7).await.len(), 1);
    }
}
