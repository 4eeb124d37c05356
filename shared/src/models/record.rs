//! Logical Record Model
//!
//! A plant-scoped business row. Only `id` and `plant` are interpreted; every
//! other field (equipment, durations, chemical parameters...) is carried
//! untouched in `fields` and serialized flat beside them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Plant;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier, stable after creation
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_id"
    )]
    pub id: Option<String>,
    /// Originating plant, immutable after creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant: Option<Plant>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Backends hand out numeric or string ids; both are kept as strings.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "record id must be a string or number, got {}",
            other
        ))),
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_plant(mut self, plant: impl Into<Plant>) -> Self {
        self.plant = Some(plant.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Overlay `other` onto `self`: its id, plant and fields win where present.
    pub fn merge(&mut self, other: Record) {
        if other.id.is_some() {
            self.id = other.id;
        }
        if other.plant.is_some() {
            self.plant = other.plant;
        }
        self.fields.extend(other.fields);
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_serialization() {
        let record = Record::new()
            .with_id("r1")
            .with_plant("NPK1")
            .with_field("equipment", "Granulator");
        let json = record.to_value().unwrap();
        assert_eq!(
            json,
            json!({ "id": "r1", "plant": "NPK1", "equipment": "Granulator" })
        );
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let record = Record::from_value(json!({ "id": 42, "hours": 1.5 })).unwrap();
        assert_eq!(record.id.as_deref(), Some("42"));
        assert!(record.plant.is_none());
        assert_eq!(record.get("hours"), Some(&json!(1.5)));
    }

    #[test]
    fn test_blank_id_is_none() {
        let record = Record::from_value(json!({ "id": "", "plant": null })).unwrap();
        assert!(record.id.is_none());
        assert!(record.plant.is_none());
        assert!(Record::from_value(json!({ "id": [1] })).is_err());
    }

    #[test]
    fn test_merge_overlays_backend_fields() {
        let mut submitted = Record::new().with_plant("NPK1").with_field("field", "X");
        let returned = Record::new().with_id("abc").with_field("createdAt", "2024-01-01");
        submitted.merge(returned);

        assert_eq!(submitted.id.as_deref(), Some("abc"));
        assert_eq!(submitted.plant, Some(Plant::from("NPK1")));
        assert_eq!(submitted.get("field"), Some(&json!("X")));
        assert_eq!(submitted.get("createdAt"), Some(&json!("2024-01-01")));
    }
}
