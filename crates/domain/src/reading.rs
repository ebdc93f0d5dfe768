//! Reading — a timestamped numeric sample from a sensor.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schema::Operation;
use crate::status::Status;
use crate::validate::{RawRecord, validate};

/// A stored sample, keyed by `(sensor_id, timestamp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub sensor_id: String,
    pub timestamp: i64,
    pub value: f64,
    #[serde(flatten)]
    pub extra: RawRecord,
}

impl Reading {
    /// Validate a raw `addSensorData` record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every missing or malformed field.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, ValidationError> {
        let mut record = validate(Operation::AddSensorData, raw)?;
        Ok(Self {
            sensor_id: record.string("sensorId")?,
            timestamp: record.integer("timestamp")?,
            value: record.number("value")?,
            extra: record.into_extra(),
        })
    }

    /// Storage key of this reading within its sensor's log.
    #[must_use]
    pub fn key(&self) -> String {
        self.timestamp.to_string()
    }
}

/// A reading as returned by a query, annotated with its status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedReading {
    pub timestamp: i64,
    pub value: f64,
    pub status: Status,
}
