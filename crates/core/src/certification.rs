//! Certification catalog definitions.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/// A certification definition, e.g. "EMT-B" in the "EMS" category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub certification_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub typical_validity_days: Option<u32>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Input payload for creating or replacing a certification definition.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCertification {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub typical_validity_days: Option<u32>,
}

impl NewCertification {
    pub fn into_certification(
        self,
        certification_id: EntityId,
        created_at: Timestamp,
    ) -> Certification {
        Certification {
            certification_id,
            name: self.name,
            description: self.description,
            category: self.category,
            typical_validity_days: self.typical_validity_days,
            created_at: Some(created_at),
        }
    }
}

pub fn validate_certification(input: &NewCertification) -> Result<(), CoreError> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    Ok(())
}
