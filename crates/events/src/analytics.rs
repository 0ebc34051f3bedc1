//! Analytics sink capability interface.
//!
//! The warehouse is an external collaborator: the application hands it
//! entity snapshots and computed readiness reports, and asks it for
//! per-unit readiness history. Which implementation backs the interface is
//! decided once at startup from configuration, never by inspecting a live
//! instance.
//!
//! Sink calls are fire-and-forget from the caller's perspective: failures
//! are logged inside the implementation and never surface to the mutation
//! or query that triggered them.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use unitwatch_core::assignment::UnitAssignment;
use unitwatch_core::personnel::Personnel;
use unitwatch_core::readiness::ReadinessReport;
use unitwatch_core::types::{EntityId, Timestamp};
use unitwatch_core::unit::Unit;

/// One historical readiness observation for a unit.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessSample {
    /// UTC calendar date of the observation (`YYYY-MM-DD`).
    pub date: String,
    pub calculated_at: Timestamp,
    pub current_staff: u32,
    pub available_staff: u32,
    pub readiness_score: u8,
    pub understaffed_flag: bool,
    pub missing_certifications: Vec<String>,
}

/// Warehouse-facing capability interface.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Record a personnel snapshot.
    async fn ingest_personnel(&self, person: &Personnel);

    /// Record a unit snapshot.
    async fn ingest_unit(&self, unit: &Unit);

    /// Record an assignment snapshot.
    async fn ingest_assignment(&self, assignment: &UnitAssignment);

    /// Record a computed readiness report.
    async fn ingest_report(&self, report: &ReadinessReport);

    /// Readiness observations for a unit over the trailing `days` days,
    /// newest first. Empty when the sink holds no history.
    async fn readiness_history(&self, unit_id: &str, days: i64) -> Vec<ReadinessSample>;
}

// ---------------------------------------------------------------------------
// Noop sink
// ---------------------------------------------------------------------------

/// Sink used when no warehouse is configured. Logs and discards.
pub struct NoopAnalyticsSink;

#[async_trait]
impl AnalyticsSink for NoopAnalyticsSink {
    async fn ingest_personnel(&self, person: &Personnel) {
        tracing::debug!(personnel_id = %person.personnel_id, "Analytics disabled, dropping personnel snapshot");
    }

    async fn ingest_unit(&self, unit: &Unit) {
        tracing::debug!(unit_id = %unit.unit_id, "Analytics disabled, dropping unit snapshot");
    }

    async fn ingest_assignment(&self, assignment: &UnitAssignment) {
        tracing::debug!(assignment_id = %assignment.assignment_id, "Analytics disabled, dropping assignment snapshot");
    }

    async fn ingest_report(&self, report: &ReadinessReport) {
        tracing::debug!(unit_id = %report.unit_id, "Analytics disabled, dropping readiness report");
    }

    async fn readiness_history(&self, unit_id: &str, _days: i64) -> Vec<ReadinessSample> {
        tracing::debug!(unit_id, "Analytics disabled, returning empty history");
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// In-memory sink
// ---------------------------------------------------------------------------

/// Process-local sink: folds ingested readiness reports into per-unit
/// history rows. Entity snapshots are accepted and counted but not
/// retained. Suitable for development and tests.
#[derive(Default)]
pub struct MemoryAnalyticsSink {
    history: RwLock<HashMap<EntityId, Vec<ReadinessSample>>>,
    ingested: RwLock<IngestCounters>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IngestCounters {
    pub personnel: u64,
    pub units: u64,
    pub assignments: u64,
    pub reports: u64,
}

impl MemoryAnalyticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of how many records of each kind were ingested.
    pub async fn counters(&self) -> IngestCounters {
        *self.ingested.read().await
    }
}

#[async_trait]
impl AnalyticsSink for MemoryAnalyticsSink {
    async fn ingest_personnel(&self, _person: &Personnel) {
        self.ingested.write().await.personnel += 1;
    }

    async fn ingest_unit(&self, _unit: &Unit) {
        self.ingested.write().await.units += 1;
    }

    async fn ingest_assignment(&self, _assignment: &UnitAssignment) {
        self.ingested.write().await.assignments += 1;
    }

    async fn ingest_report(&self, report: &ReadinessReport) {
        let calculated_at = match report.timestamp.parse::<Timestamp>() {
            Ok(ts) => ts,
            Err(e) => {
                tracing::warn!(unit_id = %report.unit_id, error = %e, "Report carries unparsable timestamp, skipping");
                return;
            }
        };

        let sample = ReadinessSample {
            date: calculated_at.date_naive().to_string(),
            calculated_at,
            current_staff: report.staff_present,
            available_staff: report.assigned_personnel.len() as u32,
            readiness_score: report.readiness_score,
            understaffed_flag: report.is_understaffed,
            missing_certifications: report.certifications_missing.clone(),
        };

        self.ingested.write().await.reports += 1;
        self.history
            .write()
            .await
            .entry(report.unit_id.clone())
            .or_default()
            .push(sample);
    }

    async fn readiness_history(&self, unit_id: &str, days: i64) -> Vec<ReadinessSample> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(days);
        let table = self.history.read().await;
        let mut samples: Vec<ReadinessSample> = table
            .get(unit_id)
            .map(|rows| {
                rows.iter()
                    .filter(|s| s.calculated_at >= cutoff)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        samples.sort_by(|a, b| b.calculated_at.cmp(&a.calculated_at));
        samples
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use unitwatch_core::unit::UnitType;

    fn report(unit_id: &str, score: u8, timestamp: &str) -> ReadinessReport {
        ReadinessReport {
            unit_id: unit_id.into(),
            unit_name: "Engine 7".into(),
            unit_type: UnitType::Engine,
            readiness_score: score,
            staff_required: 4,
            staff_present: 3,
            certifications_missing: vec!["EMT-B".into()],
            expired_certifications: vec![],
            is_understaffed: true,
            issues: vec!["Understaffed: 3/4".into()],
            assigned_personnel: vec![],
            timestamp: timestamp.into(),
        }
    }

    #[tokio::test]
    async fn noop_history_is_empty() {
        let sink = NoopAnalyticsSink;
        sink.ingest_report(&report("u-1", 75, "2026-03-01T12:00:00+00:00"))
            .await;
        assert!(sink.readiness_history("u-1", 7).await.is_empty());
    }

    #[tokio::test]
    async fn memory_sink_folds_reports_into_history() {
        let sink = MemoryAnalyticsSink::new();
        let now = chrono::Utc::now();
        sink.ingest_report(&report("u-1", 75, &now.to_rfc3339())).await;

        let history = sink.readiness_history("u-1", 7).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].readiness_score, 75);
        assert_eq!(history[0].current_staff, 3);
        assert!(history[0].understaffed_flag);
        assert_eq!(history[0].missing_certifications, vec!["EMT-B"]);
        assert_eq!(history[0].date, now.date_naive().to_string());
    }

    #[tokio::test]
    async fn history_is_scoped_per_unit_and_windowed() {
        let sink = MemoryAnalyticsSink::new();
        let now = chrono::Utc::now();
        let stale = now - chrono::Duration::days(30);

        sink.ingest_report(&report("u-1", 60, &now.to_rfc3339())).await;
        sink.ingest_report(&report("u-1", 90, &stale.to_rfc3339())).await;
        sink.ingest_report(&report("u-2", 40, &now.to_rfc3339())).await;

        let history = sink.readiness_history("u-1", 7).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].readiness_score, 60);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let sink = MemoryAnalyticsSink::new();
        let now = chrono::Utc::now();
        let earlier = now - chrono::Duration::hours(6);

        sink.ingest_report(&report("u-1", 50, &earlier.to_rfc3339())).await;
        sink.ingest_report(&report("u-1", 80, &now.to_rfc3339())).await;

        let history = sink.readiness_history("u-1", 7).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].readiness_score, 80);
        assert_eq!(history[1].readiness_score, 50);
    }

    #[tokio::test]
    async fn unparsable_report_timestamp_is_skipped() {
        let sink = MemoryAnalyticsSink::new();
        sink.ingest_report(&report("u-1", 75, "not-a-timestamp")).await;

        assert!(sink.readiness_history("u-1", 7).await.is_empty());
        assert_eq!(sink.counters().await.reports, 0);
    }

    #[tokio::test]
    async fn counters_track_entity_ingests() {
        let sink = MemoryAnalyticsSink::new();
        let unit = Unit {
            unit_id: "u-1".into(),
            unit_name: "Engine 7".into(),
            unit_type: UnitType::Engine,
            minimum_staff: 4,
            required_certifications: vec![],
            station_id: None,
        };
        sink.ingest_unit(&unit).await;
        sink.ingest_unit(&unit).await;

        assert_eq!(sink.counters().await.units, 2);
    }
}
