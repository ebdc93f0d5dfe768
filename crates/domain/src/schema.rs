//! Schema registry — declarative field specifications per operation.
//!
//! The registry is a compiled constant table: it is consulted by the
//! validator for both type checking and defaulting and is never mutated.

use crate::status::Status;

/// Number of results returned by a query that does not specify `count`.
pub const DEFAULT_COUNT: i64 = 5;

/// Default `timestamp` bound for reading queries: later than any sample.
pub const FAR_FUTURE: i64 = i64::MAX;

/// Primitive shape a field value is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    /// Nested `{min, max}` object of numbers.
    Range,
    /// `|`-separated status names, or `all`.
    Statuses,
    /// Boolean-ish switch such as `doDetail`.
    Flag,
}

/// Value substituted when an optional field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// The field is optional and stays unset.
    Null,
    Integer(i64),
    Flag(bool),
    Statuses(&'static [Status]),
}

/// Specification of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldType,
    /// `None` means the field is required.
    pub default: Option<DefaultValue>,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldType) -> Self {
        Self {
            name,
            kind,
            default: None,
        }
    }

    const fn optional(name: &'static str, kind: FieldType, default: DefaultValue) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
        }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// The validated operations exposed by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddSensorType,
    AddSensor,
    AddSensorData,
    FindSensorTypes,
    FindSensors,
    FindSensorData,
}

impl Operation {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AddSensorType => "addSensorType",
            Self::AddSensor => "addSensor",
            Self::AddSensorData => "addSensorData",
            Self::FindSensorTypes => "findSensorTypes",
            Self::FindSensors => "findSensors",
            Self::FindSensorData => "findSensorData",
        }
    }

    /// Declared fields of this operation, in validation order.
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::AddSensorType => ADD_SENSOR_TYPE,
            Self::AddSensor => ADD_SENSOR,
            Self::AddSensorData => ADD_SENSOR_DATA,
            Self::FindSensorTypes => FIND_SENSOR_TYPES,
            Self::FindSensors => FIND_SENSORS,
            Self::FindSensorData => FIND_SENSOR_DATA,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sub-fields of every [`FieldType::Range`] field.
pub const RANGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("min", FieldType::Number),
    FieldSpec::required("max", FieldType::Number),
];

const ADD_SENSOR_TYPE: &[FieldSpec] = &[
    FieldSpec::required("id", FieldType::String),
    FieldSpec::required("manufacturer", FieldType::String),
    FieldSpec::required("modelNumber", FieldType::String),
    FieldSpec::required("quantity", FieldType::String),
    FieldSpec::required("unit", FieldType::String),
    FieldSpec::required("limits", FieldType::Range),
];

const ADD_SENSOR: &[FieldSpec] = &[
    FieldSpec::required("id", FieldType::String),
    FieldSpec::required("model", FieldType::String),
    FieldSpec::required("period", FieldType::Integer),
    FieldSpec::required("expected", FieldType::Range),
];

const ADD_SENSOR_DATA: &[FieldSpec] = &[
    FieldSpec::required("sensorId", FieldType::String),
    FieldSpec::required("timestamp", FieldType::Integer),
    FieldSpec::required("value", FieldType::Number),
];

const FIND_SENSOR_TYPES: &[FieldSpec] = &[
    FieldSpec::optional("id", FieldType::String, DefaultValue::Null),
    FieldSpec::optional("index", FieldType::Integer, DefaultValue::Integer(0)),
    FieldSpec::optional(
        "count",
        FieldType::Integer,
        DefaultValue::Integer(DEFAULT_COUNT),
    ),
    FieldSpec::optional("manufacturer", FieldType::String, DefaultValue::Null),
    FieldSpec::optional("modelNumber", FieldType::String, DefaultValue::Null),
    FieldSpec::optional("quantity", FieldType::String, DefaultValue::Null),
    FieldSpec::optional("unit", FieldType::String, DefaultValue::Null),
];

const FIND_SENSORS: &[FieldSpec] = &[
    FieldSpec::optional("id", FieldType::String, DefaultValue::Null),
    FieldSpec::optional("index", FieldType::Integer, DefaultValue::Integer(0)),
    FieldSpec::optional(
        "count",
        FieldType::Integer,
        DefaultValue::Integer(DEFAULT_COUNT),
    ),
    FieldSpec::optional("model", FieldType::String, DefaultValue::Null),
    FieldSpec::optional("period", FieldType::Integer, DefaultValue::Null),
    FieldSpec::optional("doDetail", FieldType::Flag, DefaultValue::Flag(false)),
];

const FIND_SENSOR_DATA: &[FieldSpec] = &[
    FieldSpec::required("sensorId", FieldType::String),
    FieldSpec::optional(
        "timestamp",
        FieldType::Integer,
        DefaultValue::Integer(FAR_FUTURE),
    ),
    FieldSpec::optional(
        "count",
        FieldType::Integer,
        DefaultValue::Integer(DEFAULT_COUNT),
    ),
    FieldSpec::optional(
        "statuses",
        FieldType::Statuses,
        DefaultValue::Statuses(&[Status::Ok]),
    ),
    FieldSpec::optional("doDetail", FieldType::Flag, DefaultValue::Flag(false)),
];
