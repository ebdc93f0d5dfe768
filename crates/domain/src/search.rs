//! Search specs — validated inputs of the three query operations.

use crate::error::ValidationError;
use crate::schema::Operation;
use crate::sensor::Sensor;
use crate::sensor_type::SensorType;
use crate::status::StatusSet;
use crate::validate::{RawRecord, ValidatedRecord, validate};

/// A record stored under a unique string key; collections sort by it.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for SensorType {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Sensor {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Equality filters over a collection.
///
/// Filters combine with logical OR: a record matches when ANY of the given
/// fields equals its filter value.
pub trait RecordFilter<T> {
    /// Whether no filter field is set.
    fn is_empty(&self) -> bool;

    /// Whether `record` equals at least one given filter field.
    fn matches_any(&self, record: &T) -> bool;
}

/// Offset and page size of a paginated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// Offset into the (filtered) sorted sequence.
    pub index: usize,
    /// Maximum number of results.
    pub count: usize,
}

impl Paging {
    fn from_record(record: &mut ValidatedRecord) -> Result<Self, ValidationError> {
        let index = record.integer("index")?;
        let count = record.integer("count")?;

        let mut errors = Vec::new();
        let index = usize::try_from(index).map_err(|_| {
            errors.push(format!("index must be a non-negative integer, got {index}"));
        });
        let count = usize::try_from(count)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                errors.push(format!("count must be a positive integer, got {count}"));
            });
        match (index, count) {
            (Ok(index), Ok(count)) => Ok(Self { index, count }),
            _ => Err(ValidationError::new(errors)),
        }
    }

    /// `nextIndex` of a page that resumes `advance` positions after `index`.
    #[must_use]
    pub fn next_index(&self, advance: usize) -> i64 {
        i64::try_from(self.index.saturating_add(advance)).unwrap_or(i64::MAX)
    }
}

/// Filters accepted by `findSensorTypes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorTypeFilter {
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

impl RecordFilter<SensorType> for SensorTypeFilter {
    fn is_empty(&self) -> bool {
        self.manufacturer.is_none()
            && self.model_number.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
    }

    fn matches_any(&self, record: &SensorType) -> bool {
        let equals = |filter: &Option<String>, value: &str| filter.as_deref() == Some(value);
        equals(&self.manufacturer, &record.manufacturer)
            || equals(&self.model_number, &record.model_number)
            || equals(&self.quantity, &record.quantity)
            || equals(&self.unit, &record.unit)
    }
}

/// Validated `findSensorTypes` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorTypeSearch {
    pub id: Option<String>,
    pub paging: Paging,
    pub filter: SensorTypeFilter,
}

impl SensorTypeSearch {
    /// Validate a raw `findSensorTypes` record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on malformed fields, a negative `index`
    /// or a non-positive `count`.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, ValidationError> {
        let mut record = validate(Operation::FindSensorTypes, raw)?;
        Ok(Self {
            id: record.optional_string("id")?,
            paging: Paging::from_record(&mut record)?,
            filter: SensorTypeFilter {
                manufacturer: record.optional_string("manufacturer")?,
                model_number: record.optional_string("modelNumber")?,
                quantity: record.optional_string("quantity")?,
                unit: record.optional_string("unit")?,
            },
        })
    }
}

/// Filters accepted by `findSensors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorFilter {
    pub model: Option<String>,
    pub period: Option<i64>,
}

impl RecordFilter<Sensor> for SensorFilter {
    fn is_empty(&self) -> bool {
        self.model.is_none() && self.period.is_none()
    }

    fn matches_any(&self, record: &Sensor) -> bool {
        self.model.as_deref() == Some(record.model.as_str()) || self.period == Some(record.period)
    }
}

/// Validated `findSensors` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSearch {
    pub id: Option<String>,
    pub paging: Paging,
    pub filter: SensorFilter,
    /// Attach each sensor's type to the results.
    pub do_detail: bool,
}

impl SensorSearch {
    /// Validate a raw `findSensors` record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on malformed fields, a negative `index`
    /// or a non-positive `count`.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, ValidationError> {
        let mut record = validate(Operation::FindSensors, raw)?;
        Ok(Self {
            id: record.optional_string("id")?,
            paging: Paging::from_record(&mut record)?,
            filter: SensorFilter {
                model: record.optional_string("model")?,
                period: record.optional_integer("period")?,
            },
            do_detail: record.flag("doDetail")?,
        })
    }
}

/// Validated `findSensorData` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorDataSearch {
    pub sensor_id: String,
    /// Only readings at or before this timestamp are returned.
    pub timestamp: i64,
    pub count: usize,
    pub statuses: StatusSet,
    /// Attach the sensor and its type to the result.
    pub do_detail: bool,
}

impl SensorDataSearch {
    /// Validate a raw `findSensorData` record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on malformed fields or a non-positive
    /// `count`.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, ValidationError> {
        let mut record = validate(Operation::FindSensorData, raw)?;
        let sensor_id = record.string("sensorId")?;
        let timestamp = record.integer("timestamp")?;
        let count = record.integer("count")?;
        let count = usize::try_from(count)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                ValidationError::single(format!("count must be a positive integer, got {count}"))
            })?;
        Ok(Self {
            sensor_id,
            timestamp,
            count,
            statuses: record.statuses("statuses")?,
            do_detail: record.flag("doDetail")?,
        })
    }
}
