//! Personnel entity and availability states.
//!
//! Certification expirations are normalized at the deserialization
//! boundary: values arrive as RFC-3339 datetimes or bare dates and are
//! stored as canonical UTC timestamps. Entries that cannot be parsed are
//! dropped rather than rejected, so partial data never blocks readiness
//! computation for an otherwise-valid record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// AvailabilityStatus
// ---------------------------------------------------------------------------

/// Whether a person can currently be counted on for deployment.
///
/// A personnel record's availability is the single source of truth for
/// deployability. The expiry scanner is the only automated writer of the
/// `Off` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    Available,
    Off,
    InTraining,
    Deployed,
    OnCall,
}

impl Default for AvailabilityStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl AvailabilityStatus {
    /// Convert to the wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Off => "OFF",
            Self::InTraining => "IN_TRAINING",
            Self::Deployed => "DEPLOYED",
            Self::OnCall => "ON_CALL",
        }
    }

    /// Convert from a wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "OFF" => Ok(Self::Off),
            "IN_TRAINING" => Ok(Self::InTraining),
            "DEPLOYED" => Ok(Self::Deployed),
            "ON_CALL" => Ok(Self::OnCall),
            _ => Err(CoreError::Validation(format!(
                "Invalid availability status '{s}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

/// An emergency-services person: certifications held, when they expire,
/// and current deployability.
///
/// Records are never structurally deleted; retirement is status-driven.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personnel {
    pub personnel_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub rank: Option<String>,
    pub role: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_cert_expirations")]
    pub cert_expirations: BTreeMap<String, Timestamp>,
    #[serde(default)]
    pub availability_status: AvailabilityStatus,
    #[serde(default)]
    pub last_check_in: Option<Timestamp>,
    #[serde(default)]
    pub station_id: Option<String>,
    /// Weak back-reference to the unit this person is currently attached
    /// to. Lookup-only; assignments are the authoritative linkage.
    #[serde(default)]
    pub current_unit_id: Option<EntityId>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input payload for creating or replacing a personnel record.
///
/// The id is assigned (or preserved) by the API layer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPersonnel {
    pub name: String,
    #[serde(default)]
    pub rank: Option<String>,
    pub role: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_cert_expirations")]
    pub cert_expirations: BTreeMap<String, Timestamp>,
    #[serde(default)]
    pub availability_status: AvailabilityStatus,
    #[serde(default)]
    pub last_check_in: Option<Timestamp>,
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub current_unit_id: Option<EntityId>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPersonnel {
    /// Materialize an entity from this payload with the given id.
    pub fn into_personnel(self, personnel_id: EntityId) -> Personnel {
        Personnel {
            personnel_id,
            name: self.name,
            rank: self.rank,
            role: self.role,
            certifications: self.certifications,
            cert_expirations: self.cert_expirations,
            availability_status: self.availability_status,
            last_check_in: self.last_check_in,
            station_id: self.station_id,
            current_unit_id: self.current_unit_id,
            notes: self.notes,
        }
    }
}

/// Validate a personnel payload before it is admitted to the store.
pub fn validate_personnel(input: &NewPersonnel) -> Result<(), CoreError> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if input.role.trim().is_empty() {
        return Err(CoreError::Validation("role must not be empty".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Expiration normalization
// ---------------------------------------------------------------------------

/// Parse a single expiration value.
///
/// Accepts RFC-3339 datetimes (`2026-03-01T12:00:00Z`, offset forms) and
/// bare dates, which expire at the end of that day UTC. Anything else,
/// including naive datetimes, yields `None`.
pub fn parse_expiration(raw: &str) -> Option<Timestamp> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&chrono::Utc));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let end_of_day = date.and_hms_opt(23, 59, 59)?;
        return Some(chrono::DateTime::from_naive_utc_and_offset(
            end_of_day,
            chrono::Utc,
        ));
    }
    None
}

fn deserialize_cert_expirations<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Timestamp>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
    let mut normalized = BTreeMap::new();
    for (cert, value) in raw {
        if let Some(ts) = value.as_str().and_then(parse_expiration) {
            normalized.insert(cert, ts);
        }
        // Non-string or unparsable values are dropped by the leniency
        // policy; scoring proceeds without them.
    }
    Ok(normalized)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
