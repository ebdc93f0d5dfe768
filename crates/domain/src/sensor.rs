//! Sensor — a deployed instance of a sensor type.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::range::Range;
use crate::schema::Operation;
use crate::validate::{RawRecord, validate};

/// A deployed device reporting readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: String,
    /// Id of the [`SensorType`](crate::sensor_type::SensorType) this sensor is an instance of.
    pub model: String,
    /// Reporting period.
    pub period: i64,
    /// Expected operating range; readings outside are out of range.
    pub expected: Range,
    #[serde(flatten)]
    pub extra: RawRecord,
}

impl Sensor {
    /// Validate a raw `addSensor` record.
    ///
    /// The `model` reference is not checked here; that needs the store.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every missing or malformed field.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, ValidationError> {
        let mut record = validate(Operation::AddSensor, raw)?;
        Ok(Self {
            id: record.string("id")?,
            model: record.string("model")?,
            period: record.integer("period")?,
            expected: record.range("expected")?,
            extra: record.into_extra(),
        })
    }
}
