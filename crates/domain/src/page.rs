//! Result shapes of the query operations.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::reading::ClassifiedReading;
use crate::sensor::Sensor;
use crate::sensor_type::SensorType;

/// Returned as `next_index` when the page cannot be resumed.
pub const NO_NEXT_PAGE: i64 = -1;

/// One page of an id-ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Index to pass for the following page, or [`NO_NEXT_PAGE`].
    pub next_index: i64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next_index >= 0
    }
}

/// A sensor, optionally joined with its sensor type.
///
/// Serializes as the sensor's fields plus `sensorType`. A joined type
/// replaces any extra sensor field of that name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDetail {
    #[serde(flatten)]
    pub sensor: Sensor,
    #[serde(default)]
    pub sensor_type: Option<SensorType>,
}

impl Serialize for SensorDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(sensor_type) = &self.sensor_type else {
            return self.sensor.serialize(serializer);
        };
        let mut fields = match serde_json::to_value(&self.sensor) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(serde::ser::Error::custom("sensor is not an object")),
            Err(err) => return Err(serde::ser::Error::custom(err)),
        };
        let sensor_type = serde_json::to_value(sensor_type).map_err(serde::ser::Error::custom)?;
        fields.insert("sensorType".to_string(), sensor_type);
        fields.serialize(serializer)
    }
}

/// Result of `findSensorData`: latest readings first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPage {
    pub data: Vec<ClassifiedReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<SensorType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<Sensor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;
    use crate::validate::RawRecord;
    use serde_json::json;

    fn sensor() -> Sensor {
        Sensor {
            id: "s-1".to_string(),
            model: "t-1".to_string(),
            period: 30,
            expected: Range::new(10.0, 90.0),
            extra: RawRecord::new(),
        }
    }

    #[test]
    fn should_serialize_next_index_in_camel_case() {
        let page: Page<i32> = Page {
            data: vec![1, 2],
            next_index: NO_NEXT_PAGE,
        };
        assert!(!page.has_next());
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({"data": [1, 2], "nextIndex": -1})
        );
    }

    #[test]
    fn should_flatten_sensor_and_omit_missing_type() {
        let detail = SensorDetail {
            sensor: sensor(),
            sensor_type: None,
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], json!("s-1"));
        assert!(value.get("sensorType").is_none());
    }

    #[test]
    fn should_emit_sensor_type_once_when_extra_field_shares_its_name() {
        let mut sensor = sensor();
        sensor
            .extra
            .insert("sensorType".to_string(), json!("legacy"));
        let sensor_type: SensorType = serde_json::from_value(json!({
            "id": "t-1",
            "manufacturer": "Acme",
            "modelNumber": "TH-1",
            "quantity": "temperature",
            "unit": "C",
            "limits": {"min": 0.0, "max": 100.0},
        }))
        .unwrap();
        let detail = SensorDetail {
            sensor,
            sensor_type: Some(sensor_type),
        };

        let text = serde_json::to_string(&detail).unwrap();
        assert_eq!(text.matches("\"sensorType\"").count(), 1);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["sensorType"]["id"], json!("t-1"));
    }

    #[test]
    fn should_omit_detail_fields_of_reading_page_when_absent() {
        let page = ReadingPage {
            data: Vec::new(),
            sensor_type: None,
            sensor: None,
        };
        assert_eq!(serde_json::to_value(&page).unwrap(), json!({"data": []}));
    }
}
