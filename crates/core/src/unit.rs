//! Response unit entity and unit types.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EntityId;

/// The kind of apparatus or team a unit represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    Engine,
    Ladder,
    Rescue,
    Medic,
    SarTeam,
}

impl UnitType {
    /// Convert to the wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engine => "ENGINE",
            Self::Ladder => "LADDER",
            Self::Rescue => "RESCUE",
            Self::Medic => "MEDIC",
            Self::SarTeam => "SAR_TEAM",
        }
    }

    /// Convert from a wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "ENGINE" => Ok(Self::Engine),
            "LADDER" => Ok(Self::Ladder),
            "RESCUE" => Ok(Self::Rescue),
            "MEDIC" => Ok(Self::Medic),
            "SAR_TEAM" => Ok(Self::SarTeam),
            _ => Err(CoreError::Validation(format!("Invalid unit type '{s}'"))),
        }
    }
}

/// A response unit: staffing floor and the certifications a ready crew
/// must collectively hold. Immutable after creation apart from
/// administrative edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub unit_id: EntityId,
    pub unit_name: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub minimum_staff: u32,
    #[serde(default)]
    pub required_certifications: Vec<String>,
    #[serde(default)]
    pub station_id: Option<String>,
}

/// Input payload for creating or replacing a unit.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUnit {
    pub unit_name: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub minimum_staff: u32,
    #[serde(default)]
    pub required_certifications: Vec<String>,
    #[serde(default)]
    pub station_id: Option<String>,
}

impl NewUnit {
    /// Materialize an entity from this payload with the given id.
    pub fn into_unit(self, unit_id: EntityId) -> Unit {
        Unit {
            unit_id,
            unit_name: self.unit_name,
            unit_type: self.unit_type,
            minimum_staff: self.minimum_staff,
            required_certifications: self.required_certifications,
            station_id: self.station_id,
        }
    }
}

/// Validate a unit payload before it is admitted to the store.
pub fn validate_unit(input: &NewUnit) -> Result<(), CoreError> {
    if input.unit_name.trim().is_empty() {
        return Err(CoreError::Validation("unit_name must not be empty".into()));
    }
    if input.minimum_staff == 0 {
        return Err(CoreError::Validation(
            "minimum_staff must be greater than 0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> NewUnit {
        serde_json::from_value(json).expect("payload should deserialize")
    }

    #[test]
    fn unit_type_round_trip() {
        for ty in &[
            UnitType::Engine,
            UnitType::Ladder,
            UnitType::Rescue,
            UnitType::Medic,
            UnitType::SarTeam,
        ] {
            assert_eq!(UnitType::from_str_value(ty.as_str()).unwrap(), *ty);
        }
    }

    #[test]
    fn sar_team_wire_value() {
        let json = serde_json::to_value(UnitType::SarTeam).unwrap();
        assert_eq!(json, serde_json::json!("SAR_TEAM"));
    }

    #[test]
    fn unknown_unit_type_rejected() {
        assert!(UnitType::from_str_value("TANKER").is_err());
    }

    #[test]
    fn zero_minimum_staff_rejected() {
        let unit = payload(serde_json::json!({
            "unit_name": "Engine 7",
            "type": "ENGINE",
            "minimum_staff": 0
        }));
        assert!(validate_unit(&unit).is_err());
    }

    #[test]
    fn empty_name_rejected() {
        let unit = payload(serde_json::json!({
            "unit_name": "",
            "type": "MEDIC",
            "minimum_staff": 2
        }));
        assert!(validate_unit(&unit).is_err());
    }

    #[test]
    fn valid_unit_accepted() {
        let unit = payload(serde_json::json!({
            "unit_name": "Rescue 1",
            "type": "RESCUE",
            "minimum_staff": 4,
            "required_certifications": ["ROPE-1"]
        }));
        assert!(validate_unit(&unit).is_ok());

        let entity = unit.into_unit("u-1".to_string());
        assert_eq!(entity.unit_id, "u-1");
        assert_eq!(entity.required_certifications, vec!["ROPE-1"]);
    }

    #[test]
    fn type_field_uses_wire_name() {
        let unit = Unit {
            unit_id: "u-1".into(),
            unit_name: "Medic 12".into(),
            unit_type: UnitType::Medic,
            minimum_staff: 2,
            required_certifications: vec![],
            station_id: None,
        };
        let json = serde_json::to_value(&unit).unwrap();
        assert_eq!(json["type"], "MEDIC");
        assert!(json.get("unit_type").is_none());
    }
}
