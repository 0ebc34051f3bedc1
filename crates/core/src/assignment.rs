//! Unit assignments: one person's attachment to one unit for one shift
//! window. "Active" is a derived property, never stored.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/// Lifecycle state of a shift assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    OnShift,
    Pending,
    Absent,
    EarlyOff,
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        Self::OnShift
    }
}

impl AssignmentStatus {
    /// Convert to the wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnShift => "ON_SHIFT",
            Self::Pending => "PENDING",
            Self::Absent => "ABSENT",
            Self::EarlyOff => "EARLY_OFF",
        }
    }

    /// Convert from a wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "ON_SHIFT" => Ok(Self::OnShift),
            "PENDING" => Ok(Self::Pending),
            "ABSENT" => Ok(Self::Absent),
            "EARLY_OFF" => Ok(Self::EarlyOff),
            _ => Err(CoreError::Validation(format!(
                "Invalid assignment status '{s}'"
            ))),
        }
    }
}

/// One person attached to one unit for one shift window. Many assignments
/// may exist per unit/person over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitAssignment {
    pub assignment_id: EntityId,
    pub unit_id: EntityId,
    pub personnel_id: EntityId,
    pub shift_start: Timestamp,
    pub shift_end: Timestamp,
    #[serde(default)]
    pub assignment_status: AssignmentStatus,
}

/// Input payload for creating an assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUnitAssignment {
    pub unit_id: EntityId,
    pub personnel_id: EntityId,
    pub shift_start: Timestamp,
    pub shift_end: Timestamp,
    #[serde(default)]
    pub assignment_status: AssignmentStatus,
}

impl NewUnitAssignment {
    /// Materialize an entity from this payload with the given id.
    pub fn into_assignment(self, assignment_id: EntityId) -> UnitAssignment {
        UnitAssignment {
            assignment_id,
            unit_id: self.unit_id,
            personnel_id: self.personnel_id,
            shift_start: self.shift_start,
            shift_end: self.shift_end,
            assignment_status: self.assignment_status,
        }
    }
}

/// Validate the shift window of an assignment payload.
pub fn validate_shift_window(input: &NewUnitAssignment) -> Result<(), CoreError> {
    if input.shift_end <= input.shift_start {
        return Err(CoreError::Validation(
            "shift_end must be after shift_start".into(),
        ));
    }
    Ok(())
}

/// The UTC calendar-day window containing `now`:
/// [00:00:00.000000, 23:59:59.999999].
pub fn today_window(now: Timestamp) -> (Timestamp, Timestamp) {
    let date = now.date_naive();
    let start = Utc.from_utc_datetime(&date.and_hms_micro_opt(0, 0, 0, 0).expect("valid midnight"));
    let end = Utc.from_utc_datetime(
        &date
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .expect("valid end of day"),
    );
    (start, end)
}

/// Whether an assignment counts toward readiness at `now`.
///
/// Active means ON_SHIFT and either currently inside the shift window or
/// scheduled to start within today's UTC calendar day.
pub fn is_active_at(assignment: &UnitAssignment, now: Timestamp) -> bool {
    if assignment.assignment_status != AssignmentStatus::OnShift {
        return false;
    }
    let (today_start, today_end) = today_window(now);
    let currently_on = assignment.shift_start <= now && now <= assignment.shift_end;
    let starts_today = assignment.shift_start >= today_start && assignment.shift_start <= today_end;
    currently_on || starts_today
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ts(s: &str) -> Timestamp {
        s.parse().expect("valid timestamp")
    }

    fn assignment(start: Timestamp, end: Timestamp, status: AssignmentStatus) -> UnitAssignment {
        UnitAssignment {
            assignment_id: "a-1".into(),
            unit_id: "u-1".into(),
            personnel_id: "p-1".into(),
            shift_start: start,
            shift_end: end,
            assignment_status: status,
        }
    }

    #[test]
    fn status_round_trip() {
        for status in &[
            AssignmentStatus::OnShift,
            AssignmentStatus::Pending,
            AssignmentStatus::Absent,
            AssignmentStatus::EarlyOff,
        ] {
            assert_eq!(
                AssignmentStatus::from_str_value(status.as_str()).unwrap(),
                *status
            );
        }
    }

    #[test]
    fn shift_window_must_be_forward() {
        let input = NewUnitAssignment {
            unit_id: "u-1".into(),
            personnel_id: "p-1".into(),
            shift_start: ts("2026-03-01T08:00:00Z"),
            shift_end: ts("2026-03-01T08:00:00Z"),
            assignment_status: AssignmentStatus::OnShift,
        };
        assert!(validate_shift_window(&input).is_err());
    }

    #[test]
    fn today_window_spans_utc_day() {
        let (start, end) = today_window(ts("2026-03-01T15:30:00Z"));
        assert_eq!(start.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-03-01T23:59:59.999999+00:00");
    }

    #[test]
    fn active_when_inside_shift_window() {
        let now = ts("2026-03-01T12:00:00Z");
        let a = assignment(
            now - Duration::hours(2),
            now + Duration::hours(6),
            AssignmentStatus::OnShift,
        );
        assert!(is_active_at(&a, now));
    }

    #[test]
    fn active_when_shift_starts_later_today() {
        let now = ts("2026-03-01T08:00:00Z");
        let a = assignment(
            ts("2026-03-01T20:00:00Z"),
            ts("2026-03-02T06:00:00Z"),
            AssignmentStatus::OnShift,
        );
        assert!(is_active_at(&a, now));
    }

    #[test]
    fn inactive_when_shift_starts_tomorrow() {
        let now = ts("2026-03-01T08:00:00Z");
        let a = assignment(
            ts("2026-03-02T08:00:00Z"),
            ts("2026-03-02T18:00:00Z"),
            AssignmentStatus::OnShift,
        );
        assert!(!is_active_at(&a, now));
    }

    #[test]
    fn overnight_shift_from_yesterday_is_still_active() {
        // Started yesterday, still running now.
        let now = ts("2026-03-01T02:00:00Z");
        let a = assignment(
            ts("2026-02-28T20:00:00Z"),
            ts("2026-03-01T06:00:00Z"),
            AssignmentStatus::OnShift,
        );
        assert!(is_active_at(&a, now));
    }

    #[test]
    fn ended_shift_from_yesterday_is_inactive() {
        let now = ts("2026-03-01T12:00:00Z");
        let a = assignment(
            ts("2026-02-28T08:00:00Z"),
            ts("2026-02-28T18:00:00Z"),
            AssignmentStatus::OnShift,
        );
        assert!(!is_active_at(&a, now));
    }

    #[test]
    fn non_on_shift_status_is_never_active() {
        let now = ts("2026-03-01T12:00:00Z");
        for status in &[
            AssignmentStatus::Pending,
            AssignmentStatus::Absent,
            AssignmentStatus::EarlyOff,
        ] {
            let a = assignment(now - Duration::hours(1), now + Duration::hours(1), *status);
            assert!(!is_active_at(&a, now), "{status:?} should not be active");
        }
    }

    #[test]
    fn boundary_instants_are_inclusive() {
        let start = ts("2026-03-01T08:00:00Z");
        let end = ts("2026-03-01T18:00:00Z");
        let a = assignment(start, end, AssignmentStatus::OnShift);
        assert!(is_active_at(&a, start));
        assert!(is_active_at(&a, end));
    }
}
