//! Unit readiness scoring.
//!
//! Pure evaluation logic: given a unit, the personnel currently counted as
//! assigned, and their already-filtered active assignments, produce the
//! readiness breakdown. No I/O; the caller supplies `now`.

use serde::{Deserialize, Serialize};

use crate::assignment::{AssignmentStatus, UnitAssignment};
use crate::personnel::Personnel;
use crate::types::{EntityId, Timestamp};
use crate::unit::{Unit, UnitType};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Score penalty per required certification no assigned person holds.
pub const MISSING_CERT_PENALTY: f64 = 15.0;

/// Score penalty per expired certification among assigned personnel.
pub const EXPIRED_CERT_PENALTY: f64 = 20.0;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Calculator output: every [`ReadinessReport`] field except the unit
/// identity, personnel snapshot, and computation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessBreakdown {
    pub readiness_score: u8,
    pub staff_required: u32,
    pub staff_present: u32,
    pub certifications_missing: Vec<String>,
    pub expired_certifications: Vec<String>,
    pub is_understaffed: bool,
    pub issues: Vec<String>,
}

/// Snapshot of one assigned person carried in a readiness report.
/// Deliberately omits expiration data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedPersonnel {
    pub personnel_id: EntityId,
    pub name: String,
    pub role: String,
    pub certifications: Vec<String>,
}

impl From<&Personnel> for AssignedPersonnel {
    fn from(person: &Personnel) -> Self {
        Self {
            personnel_id: person.personnel_id.clone(),
            name: person.name.clone(),
            role: person.role.clone(),
            certifications: person.certifications.clone(),
        }
    }
}

/// A unit's operational readiness at one instant.
///
/// This is a value object recomputed on demand, never cached beyond a
/// single response or broadcast. Field names and order are the wire
/// contract consumed by existing clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub unit_id: EntityId,
    pub unit_name: String,
    pub unit_type: UnitType,
    pub readiness_score: u8,
    pub staff_required: u32,
    pub staff_present: u32,
    pub certifications_missing: Vec<String>,
    pub expired_certifications: Vec<String>,
    pub is_understaffed: bool,
    pub issues: Vec<String>,
    pub assigned_personnel: Vec<AssignedPersonnel>,
    /// ISO-8601 UTC timestamp of computation.
    pub timestamp: String,
}

impl ReadinessReport {
    /// Assemble the full report from a breakdown plus unit identity and
    /// the personnel snapshot.
    pub fn assemble(
        unit: &Unit,
        breakdown: ReadinessBreakdown,
        assigned_personnel: Vec<AssignedPersonnel>,
        computed_at: Timestamp,
    ) -> Self {
        Self {
            unit_id: unit.unit_id.clone(),
            unit_name: unit.unit_name.clone(),
            unit_type: unit.unit_type,
            readiness_score: breakdown.readiness_score,
            staff_required: breakdown.staff_required,
            staff_present: breakdown.staff_present,
            certifications_missing: breakdown.certifications_missing,
            expired_certifications: breakdown.expired_certifications,
            is_understaffed: breakdown.is_understaffed,
            issues: breakdown.issues,
            assigned_personnel,
            timestamp: computed_at.to_rfc3339(),
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Score a unit against its currently-assigned personnel.
///
/// `assignments` must already be filtered to the active set for the unit;
/// only their status is re-examined here. Deterministic given the inputs
/// and `now`.
pub fn evaluate_unit(
    unit: &Unit,
    assigned_personnel: &[Personnel],
    assignments: &[UnitAssignment],
    now: Timestamp,
) -> ReadinessBreakdown {
    let staff_required = unit.minimum_staff;
    let staff_present = assignments
        .iter()
        .filter(|a| a.assignment_status == AssignmentStatus::OnShift)
        .count() as u32;

    // Required certs nobody on the crew holds, in the unit's declared order.
    let certifications_missing: Vec<String> = unit
        .required_certifications
        .iter()
        .filter(|req| {
            !assigned_personnel
                .iter()
                .any(|p| p.certifications.iter().any(|c| c == *req))
        })
        .cloned()
        .collect();

    // Every expired (person, cert) pair among the crew.
    let mut expired_certifications = Vec::new();
    for person in assigned_personnel {
        for (cert, expiration) in &person.cert_expirations {
            if *expiration < now {
                expired_certifications.push(format!("{}: {}", person.name, cert));
            }
        }
    }

    let staffing_score = if staff_required == 0 {
        100.0
    } else {
        f64::min(100.0, staff_present as f64 / staff_required as f64 * 100.0)
    };

    let cert_penalty = certifications_missing.len() as f64 * MISSING_CERT_PENALTY;
    let expired_penalty = expired_certifications.len() as f64 * EXPIRED_CERT_PENALTY;

    // Truncated, not rounded; clamped to [0, 100] by construction.
    let readiness_score = f64::max(0.0, staffing_score - cert_penalty - expired_penalty) as u8;

    let is_understaffed = staff_present < staff_required
        || !certifications_missing.is_empty()
        || !expired_certifications.is_empty();

    let mut issues = Vec::new();
    if staff_present < staff_required {
        issues.push(format!("Understaffed: {staff_present}/{staff_required}"));
    }
    if !certifications_missing.is_empty() {
        issues.push(format!(
            "Missing certifications: {}",
            certifications_missing.join(", ")
        ));
    }
    if !expired_certifications.is_empty() {
        issues.push(format!(
            "Expired certifications: {}",
            expired_certifications.join(", ")
        ));
    }

    ReadinessBreakdown {
        readiness_score,
        staff_required,
        staff_present,
        certifications_missing,
        expired_certifications,
        is_understaffed,
        issues,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
