//! Sensor type — a device model definition with hard operating limits.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::range::Range;
use crate::schema::Operation;
use crate::validate::{RawRecord, validate};

/// A device model such as a particular thermometer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorType {
    pub id: String,
    pub manufacturer: String,
    pub model_number: String,
    /// Physical quantity measured (e.g. `temperature`).
    pub quantity: String,
    pub unit: String,
    /// Hard limits; readings outside are classified as errors.
    pub limits: Range,
    /// Input fields not declared by the schema, kept verbatim.
    #[serde(flatten)]
    pub extra: RawRecord,
}

impl SensorType {
    /// Validate a raw `addSensorType` record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every missing or malformed field.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, ValidationError> {
        let mut record = validate(Operation::AddSensorType, raw)?;
        Ok(Self {
            id: record.string("id")?,
            manufacturer: record.string("manufacturer")?,
            model_number: record.string("modelNumber")?,
            quantity: record.string("quantity")?,
            unit: record.string("unit")?,
            limits: record.range("limits")?,
            extra: record.into_extra(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    fn thermometer() -> RawRecord {
        raw(json!({
            "id": "tmp-1",
            "manufacturer": "Acme",
            "modelNumber": "T-100",
            "quantity": "temperature",
            "unit": "C",
            "limits": {"min": "-40", "max": 125},
        }))
    }

    #[test]
    fn should_build_sensor_type_when_record_is_valid() {
        let sensor_type = SensorType::from_raw(&thermometer()).unwrap();
        assert_eq!(sensor_type.id, "tmp-1");
        assert_eq!(sensor_type.model_number, "T-100");
        assert_eq!(sensor_type.limits, Range::new(-40.0, 125.0));
        assert!(sensor_type.extra.is_empty());
    }

    #[test]
    fn should_keep_unknown_fields_in_extra() {
        let mut input = thermometer();
        input.insert("color".to_string(), json!("blue"));
        let sensor_type = SensorType::from_raw(&input).unwrap();
        assert_eq!(sensor_type.extra["color"], json!("blue"));
    }

    #[test]
    fn should_serialize_with_camel_case_and_flattened_extra() {
        let mut input = thermometer();
        input.insert("color".to_string(), json!("blue"));
        let sensor_type = SensorType::from_raw(&input).unwrap();
        let value = serde_json::to_value(&sensor_type).unwrap();
        assert_eq!(value["modelNumber"], json!("T-100"));
        assert_eq!(value["color"], json!("blue"));
        assert_eq!(value["limits"], json!({"min": -40.0, "max": 125.0}));
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let mut input = thermometer();
        input.insert("tags".to_string(), json!(["lab", "outdoor"]));
        let sensor_type = SensorType::from_raw(&input).unwrap();
        let json = serde_json::to_string(&sensor_type).unwrap();
        let parsed: SensorType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sensor_type);
    }

    #[test]
    fn should_reject_record_with_missing_limits() {
        let mut input = thermometer();
        input.remove("limits");
        let err = SensorType::from_raw(&input).unwrap_err();
        assert_eq!(err.messages(), ["missing value for limits"]);
    }
}
