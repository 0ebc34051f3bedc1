//! Certification expiry classification.
//!
//! Pure walks over personnel records that classify each (certification,
//! expiration) pair as expiring-soon or expired. Day counts use floor
//! division, so a certification expired by any fraction of a day reports a
//! negative `days_until_expiry`.

use serde::Serialize;

use crate::personnel::Personnel;
use crate::types::{EntityId, Timestamp};

const SECONDS_PER_DAY: i64 = 86_400;

/// A certification at or past its look-ahead cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiringCertification {
    pub personnel_id: EntityId,
    pub name: String,
    pub certification: String,
    pub expiration_date: String,
    /// Whole days until expiration; negative once expired.
    pub days_until_expiry: i64,
    pub is_expired: bool,
}

/// A certification whose expiration already passed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiredCertification {
    pub personnel_id: EntityId,
    pub name: String,
    pub certification: String,
    pub expiration_date: String,
    pub days_expired: i64,
}

/// Whole days from `from` to `to`, floored.
fn days_floor(from: Timestamp, to: Timestamp) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Every certification expiring within `days_ahead` days of `now`,
/// including ones already expired.
pub fn list_expiring<'a>(
    personnel: impl IntoIterator<Item = &'a Personnel>,
    now: Timestamp,
    days_ahead: i64,
) -> Vec<ExpiringCertification> {
    let cutoff = now + chrono::Duration::days(days_ahead);
    let mut expiring = Vec::new();

    for person in personnel {
        for (cert, expiration) in &person.cert_expirations {
            if *expiration <= cutoff {
                let days_until_expiry = days_floor(now, *expiration);
                expiring.push(ExpiringCertification {
                    personnel_id: person.personnel_id.clone(),
                    name: person.name.clone(),
                    certification: cert.clone(),
                    expiration_date: expiration.to_rfc3339(),
                    days_until_expiry,
                    is_expired: days_until_expiry < 0,
                });
            }
        }
    }

    expiring
}

/// Every certification already expired at `now`.
pub fn list_expired<'a>(
    personnel: impl IntoIterator<Item = &'a Personnel>,
    now: Timestamp,
) -> Vec<ExpiredCertification> {
    let mut expired = Vec::new();

    for person in personnel {
        for (cert, expiration) in &person.cert_expirations {
            if *expiration < now {
                expired.push(ExpiredCertification {
                    personnel_id: person.personnel_id.clone(),
                    name: person.name.clone(),
                    certification: cert.clone(),
                    expiration_date: expiration.to_rfc3339(),
                    days_expired: days_floor(*expiration, now),
                });
            }
        }
    }

    expired
}
