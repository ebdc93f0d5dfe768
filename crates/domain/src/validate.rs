//! Validator — converts raw input mappings into typed, defaulted records.
//!
//! Every declared field of an [`Operation`] is checked in schema order and
//! all problems are collected before failing, so a caller sees the complete
//! list of messages in one pass. Keys not declared by the schema are kept
//! verbatim in the record's extra bag.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::error::ValidationError;
use crate::range::Range;
use crate::schema::{DefaultValue, FieldSpec, FieldType, Operation, RANGE_FIELDS};
use crate::status::{Status, StatusSet};

/// Raw key/value input as received from a caller.
pub type RawRecord = Map<String, Value>;

/// 2^63, the first float past `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// A coerced field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Optional field left unset.
    Null,
    String(String),
    Integer(i64),
    Number(f64),
    Range(Range),
    Statuses(StatusSet),
    Flag(bool),
}

impl FieldValue {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Range(_) => "range",
            Self::Statuses(_) => "statuses",
            Self::Flag(_) => "flag",
        }
    }
}

impl From<DefaultValue> for FieldValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Null => Self::Null,
            DefaultValue::Integer(n) => Self::Integer(n),
            DefaultValue::Flag(b) => Self::Flag(b),
            DefaultValue::Statuses(statuses) => {
                Self::Statuses(statuses.iter().copied().collect())
            }
        }
    }
}

/// Output of a successful [`validate`] call: coerced declared fields plus
/// the untouched extra keys.
#[derive(Debug, Clone, Default)]
pub struct ValidatedRecord {
    values: HashMap<&'static str, FieldValue>,
    extra: RawRecord,
}

impl ValidatedRecord {
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Remove and return a coerced field.
    pub fn take(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Take a required string field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the field is unset or not a string.
    pub fn string(&mut self, name: &str) -> Result<String, ValidationError> {
        match self.take(name) {
            Some(FieldValue::String(value)) => Ok(value),
            other => Err(mismatch(name, other)),
        }
    }

    /// Take an optional string field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the field holds a non-string value.
    pub fn optional_string(&mut self, name: &str) -> Result<Option<String>, ValidationError> {
        match self.take(name) {
            Some(FieldValue::String(value)) => Ok(Some(value)),
            None | Some(FieldValue::Null) => Ok(None),
            other => Err(mismatch(name, other)),
        }
    }

    /// Take a required integer field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the field is unset or not an integer.
    pub fn integer(&mut self, name: &str) -> Result<i64, ValidationError> {
        match self.take(name) {
            Some(FieldValue::Integer(value)) => Ok(value),
            other => Err(mismatch(name, other)),
        }
    }

    /// Take an optional integer field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the field holds a non-integer value.
    pub fn optional_integer(&mut self, name: &str) -> Result<Option<i64>, ValidationError> {
        match self.take(name) {
            Some(FieldValue::Integer(value)) => Ok(Some(value)),
            None | Some(FieldValue::Null) => Ok(None),
            other => Err(mismatch(name, other)),
        }
    }

    /// Take a required number field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the field is unset or not a number.
    pub fn number(&mut self, name: &str) -> Result<f64, ValidationError> {
        match self.take(name) {
            Some(FieldValue::Number(value)) => Ok(value),
            other => Err(mismatch(name, other)),
        }
    }

    /// Take a required range field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the field is unset or not a range.
    pub fn range(&mut self, name: &str) -> Result<Range, ValidationError> {
        match self.take(name) {
            Some(FieldValue::Range(value)) => Ok(value),
            other => Err(mismatch(name, other)),
        }
    }

    /// Take a statuses field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the field is unset or not a status set.
    pub fn statuses(&mut self, name: &str) -> Result<StatusSet, ValidationError> {
        match self.take(name) {
            Some(FieldValue::Statuses(value)) => Ok(value),
            other => Err(mismatch(name, other)),
        }
    }

    /// Take a flag field; an unset flag reads as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the field holds a non-flag value.
    pub fn flag(&mut self, name: &str) -> Result<bool, ValidationError> {
        match self.take(name) {
            Some(FieldValue::Flag(value)) => Ok(value),
            None | Some(FieldValue::Null) => Ok(false),
            other => Err(mismatch(name, other)),
        }
    }

    #[must_use]
    pub fn extra(&self) -> &RawRecord {
        &self.extra
    }

    #[must_use]
    pub fn into_extra(self) -> RawRecord {
        self.extra
    }
}

fn mismatch(name: &str, found: Option<FieldValue>) -> ValidationError {
    match found {
        None => ValidationError::single(format!("missing value for {name}")),
        Some(value) => {
            ValidationError::single(format!("unexpected {} value for {name}", value.kind_name()))
        }
    }
}

/// Whether a raw value counts as "not provided".
///
/// Missing keys, JSON `null` and strings that trim to empty are absent.
#[must_use]
pub fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Validate `raw` against the schema of `operation`.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every missing or malformed field.
pub fn validate(operation: Operation, raw: &RawRecord) -> Result<ValidatedRecord, ValidationError> {
    let fields = operation.fields();
    let mut errors = Vec::new();
    let values = validate_fields(fields, raw, "", &mut errors);
    if !errors.is_empty() {
        return Err(ValidationError::new(errors));
    }

    let extra = raw
        .iter()
        .filter(|(key, _)| !fields.iter().any(|spec| spec.name == key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(ValidatedRecord { values, extra })
}

fn validate_fields(
    fields: &'static [FieldSpec],
    raw: &RawRecord,
    prefix: &str,
    errors: &mut Vec<String>,
) -> HashMap<&'static str, FieldValue> {
    let mut values = HashMap::with_capacity(fields.len());
    for spec in fields {
        let name = if prefix.is_empty() {
            spec.name.to_string()
        } else {
            format!("{prefix}.{}", spec.name)
        };

        let coerced = match raw.get(spec.name) {
            Some(value) if !is_absent(Some(value)) => coerce(spec.kind, &name, value, errors),
            _ => default_for(spec, &name, errors),
        };
        if let Some(coerced) = coerced {
            values.insert(spec.name, coerced);
        }
    }
    values
}

fn default_for(spec: &FieldSpec, name: &str, errors: &mut Vec<String>) -> Option<FieldValue> {
    if let Some(default) = spec.default {
        Some(default.into())
    } else {
        errors.push(format!("missing value for {name}"));
        None
    }
}

fn coerce(
    kind: FieldType,
    name: &str,
    value: &Value,
    errors: &mut Vec<String>,
) -> Option<FieldValue> {
    let coerced = match kind {
        FieldType::String => coerce_string(name, value).map(FieldValue::String),
        FieldType::Number => coerce_number(name, value).map(FieldValue::Number),
        FieldType::Integer => coerce_integer(name, value).map(FieldValue::Integer),
        FieldType::Statuses => coerce_statuses(name, value).map(FieldValue::Statuses),
        FieldType::Flag => coerce_flag(name, value).map(FieldValue::Flag),
        FieldType::Range => return coerce_range(name, value, errors).map(FieldValue::Range),
    };
    match coerced {
        Ok(value) => Some(value),
        Err(message) => {
            errors.push(message);
            None
        }
    }
}

fn coerce_string(name: &str, value: &Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => Err(wrong_type("String", name, other)),
    }
}

fn coerce_number(name: &str, value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) if is_decimal_numeral(text) => text.parse().ok(),
        Value::String(_) => None,
        other => return Err(wrong_type("Number or String", name, other)),
    };
    // Non-finite values cannot be stored as JSON.
    parsed
        .filter(|number| number.is_finite())
        .ok_or_else(|| format!("value {} for {name} is not a number", display(value)))
}

fn coerce_integer(name: &str, value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(number) => integer_from_number(number)
            .ok_or_else(|| format!("value {number} for {name} is not an integer")),
        Value::String(text) if is_integer_numeral(text) => text
            .parse()
            .map_err(|_| format!("value {text} for {name} is not an integer")),
        Value::String(text) => Err(format!("value {text} for {name} is not an integer")),
        other => Err(wrong_type("Number or String", name, other)),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integer_from_number(number: &Number) -> Option<i64> {
    if let Some(value) = number.as_i64() {
        return Some(value);
    }
    let value = number.as_f64()?;
    if value.trunc() == value && (-I64_BOUND..I64_BOUND).contains(&value) {
        Some(value as i64)
    } else {
        None
    }
}

fn coerce_range(name: &str, value: &Value, errors: &mut Vec<String>) -> Option<Range> {
    let Value::Object(bounds) = value else {
        errors.push(wrong_type("Object", name, value));
        return None;
    };

    let before = errors.len();
    let mut values = validate_fields(RANGE_FIELDS, bounds, name, errors);
    if errors.len() > before {
        return None;
    }
    match (values.remove("min"), values.remove("max")) {
        (Some(FieldValue::Number(min)), Some(FieldValue::Number(max))) => Some(Range::new(min, max)),
        _ => None,
    }
}

fn coerce_statuses(name: &str, value: &Value) -> Result<StatusSet, String> {
    let Value::String(text) = value else {
        return Err(wrong_type("String", name, value));
    };
    if text == "all" {
        return Ok(StatusSet::all());
    }

    let mut statuses = Vec::new();
    let mut unknown = Vec::new();
    for token in text.split('|') {
        match token.parse::<Status>() {
            Ok(status) => statuses.push(status),
            Err(_) => unknown.push(token),
        }
    }
    if unknown.is_empty() {
        Ok(statuses.into_iter().collect())
    } else {
        Err(format!(
            "invalid status {} in status {text}",
            unknown.join(",")
        ))
    }
}

fn coerce_flag(name: &str, value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::String(text) => Ok(!(text == "0" || text.eq_ignore_ascii_case("false"))),
        Value::Number(number) => Ok(number.as_f64().is_some_and(|number| number != 0.0)),
        other => Err(wrong_type("Boolean, Number or String", name, other)),
    }
}

fn wrong_type(expected: &str, name: &str, value: &Value) -> String {
    format!(
        "require type {expected} for {name} value {} instead of type {}",
        display(value),
        type_name(value)
    )
}

fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `[+-]?digits(.digits)?([eE][+-]?digits)?`
fn is_decimal_numeral(text: &str) -> bool {
    let unsigned = strip_sign(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };
    is_digits(whole)
        && fraction.is_none_or(is_digits)
        && exponent.is_none_or(|exponent| is_digits(strip_sign(exponent)))
}

/// `[+-]?digits`
fn is_integer_numeral(text: &str) -> bool {
    is_digits(strip_sign(text))
}

fn strip_sign(text: &str) -> &str {
    text.strip_prefix(['+', '-']).unwrap_or(text)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FAR_FUTURE;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    fn messages(result: Result<ValidatedRecord, ValidationError>) -> Vec<String> {
        result.unwrap_err().into_messages()
    }

    #[test]
    fn should_treat_null_missing_and_blank_strings_as_absent() {
        assert!(is_absent(None));
        assert!(is_absent(Some(&Value::Null)));
        assert!(is_absent(Some(&json!("   "))));
        assert!(!is_absent(Some(&json!(0))));
        assert!(!is_absent(Some(&json!(false))));
        assert!(!is_absent(Some(&json!("x"))));
    }

    #[test]
    fn should_report_every_missing_field_when_record_is_empty() {
        let errors = messages(validate(Operation::AddSensorType, &RawRecord::new()));
        assert_eq!(
            errors,
            [
                "missing value for id",
                "missing value for manufacturer",
                "missing value for modelNumber",
                "missing value for quantity",
                "missing value for unit",
                "missing value for limits",
            ]
        );
    }

    #[test]
    fn should_collect_errors_from_several_fields_in_one_pass() {
        let input = raw(json!({
            "id": 12,
            "model": "t-1",
            "period": "1.5",
            "expected": {"min": "low", "max": 3},
        }));
        let errors = messages(validate(Operation::AddSensor, &input));
        assert_eq!(
            errors,
            [
                "require type String for id value 12 instead of type number",
                "value 1.5 for period is not an integer",
                "value low for expected.min is not a number",
            ]
        );
    }

    #[test]
    fn should_apply_defaults_when_optional_fields_omitted() {
        let input = raw(json!({"sensorId": "s-1"}));
        let record = validate(Operation::FindSensorData, &input).unwrap();
        assert_eq!(record.value("timestamp"), Some(&FieldValue::Integer(FAR_FUTURE)));
        assert_eq!(record.value("count"), Some(&FieldValue::Integer(5)));
        assert_eq!(
            record.value("statuses"),
            Some(&FieldValue::Statuses([Status::Ok].into_iter().collect()))
        );
        assert_eq!(record.value("doDetail"), Some(&FieldValue::Flag(false)));
    }

    #[test]
    fn should_apply_default_when_value_is_blank_string() {
        let input = raw(json!({"index": "  ", "count": null}));
        let record = validate(Operation::FindSensorTypes, &input).unwrap();
        assert_eq!(record.value("index"), Some(&FieldValue::Integer(0)));
        assert_eq!(record.value("count"), Some(&FieldValue::Integer(5)));
        assert_eq!(record.value("id"), Some(&FieldValue::Null));
    }

    #[test]
    fn should_coerce_numeric_strings() {
        let input = raw(json!({"sensorId": "s", "timestamp": "+42", "value": "-1.5e2"}));
        let record = validate(Operation::AddSensorData, &input).unwrap();
        assert_eq!(record.value("timestamp"), Some(&FieldValue::Integer(42)));
        assert_eq!(record.value("value"), Some(&FieldValue::Number(-150.0)));
    }

    #[test]
    fn should_reject_malformed_numerals() {
        for bad in ["1.", ".5", "1e", "0x10", "1,5", "12abc", "--1"] {
            let input = raw(json!({"sensorId": "s", "timestamp": 1, "value": bad}));
            let errors = messages(validate(Operation::AddSensorData, &input));
            assert_eq!(errors, [format!("value {bad} for value is not a number")]);
        }
    }

    #[test]
    fn should_reject_numerals_that_overflow_to_infinity() {
        let input = raw(json!({"sensorId": "s", "timestamp": 1, "value": "1e999"}));
        let errors = messages(validate(Operation::AddSensorData, &input));
        assert_eq!(errors, ["value 1e999 for value is not a number"]);

        let input = raw(json!({"id": "s", "model": "t", "period": 1, "expected": {"min": "-1e400", "max": 1}}));
        let errors = messages(validate(Operation::AddSensor, &input));
        assert_eq!(errors, ["value -1e400 for expected.min is not a number"]);
    }

    #[test]
    fn should_accept_whole_float_as_integer() {
        let input = raw(json!({"sensorId": "s", "timestamp": 30.0, "value": 1}));
        let record = validate(Operation::AddSensorData, &input).unwrap();
        assert_eq!(record.value("timestamp"), Some(&FieldValue::Integer(30)));
    }

    #[test]
    fn should_reject_fractional_integer() {
        let input = raw(json!({"sensorId": "s", "timestamp": 30.5, "value": 1}));
        let errors = messages(validate(Operation::AddSensorData, &input));
        assert_eq!(errors, ["value 30.5 for timestamp is not an integer"]);
    }

    #[test]
    fn should_reject_integer_string_that_overflows() {
        let input = raw(json!({"sensorId": "s", "timestamp": "99999999999999999999", "value": 1}));
        let errors = messages(validate(Operation::AddSensorData, &input));
        assert_eq!(
            errors,
            ["value 99999999999999999999 for timestamp is not an integer"]
        );
    }

    #[test]
    fn should_reject_non_scalar_number() {
        let input = raw(json!({"sensorId": "s", "timestamp": 1, "value": [1]}));
        let errors = messages(validate(Operation::AddSensorData, &input));
        assert_eq!(
            errors,
            ["require type Number or String for value value [1] instead of type array"]
        );
    }

    #[test]
    fn should_prefix_nested_range_errors_with_field_name() {
        let input = raw(json!({
            "id": "t", "manufacturer": "m", "modelNumber": "n",
            "quantity": "q", "unit": "u", "limits": {"max": "x"},
        }));
        let errors = messages(validate(Operation::AddSensorType, &input));
        assert_eq!(
            errors,
            ["missing value for limits.min", "value x for limits.max is not a number"]
        );
    }

    #[test]
    fn should_reject_range_that_is_not_an_object() {
        let input = raw(json!({"id": "s", "model": "t", "period": 1, "expected": "0-10"}));
        let errors = messages(validate(Operation::AddSensor, &input));
        assert_eq!(
            errors,
            ["require type Object for expected value 0-10 instead of type string"]
        );
    }

    #[test]
    fn should_accept_inverted_range() {
        let input = raw(json!({"id": "s", "model": "t", "period": 1, "expected": {"min": 9, "max": 1}}));
        let mut record = validate(Operation::AddSensor, &input).unwrap();
        assert_eq!(record.range("expected").unwrap(), Range::new(9.0, 1.0));
    }

    #[test]
    fn should_expand_all_statuses() {
        let input = raw(json!({"sensorId": "s", "statuses": "all"}));
        let mut record = validate(Operation::FindSensorData, &input).unwrap();
        assert_eq!(record.statuses("statuses").unwrap(), StatusSet::all());
    }

    #[test]
    fn should_split_statuses_on_pipe() {
        let input = raw(json!({"sensorId": "s", "statuses": "error|outOfRange"}));
        let mut record = validate(Operation::FindSensorData, &input).unwrap();
        let statuses = record.statuses("statuses").unwrap();
        assert!(statuses.contains(Status::Error));
        assert!(statuses.contains(Status::OutOfRange));
        assert!(!statuses.contains(Status::Ok));
    }

    #[test]
    fn should_report_all_unknown_statuses_in_one_message() {
        let input = raw(json!({"sensorId": "s", "statuses": "ok|bad|worse"}));
        let errors = messages(validate(Operation::FindSensorData, &input));
        assert_eq!(errors, ["invalid status bad,worse in status ok|bad|worse"]);
    }

    #[test]
    fn should_read_flag_from_bool_number_or_string() {
        for (input, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!("yes"), true),
            (json!("false"), false),
            (json!("0"), false),
            (json!(1), true),
            (json!(0), false),
        ] {
            let input = raw(json!({"sensorId": "s", "doDetail": input}));
            let mut record = validate(Operation::FindSensorData, &input).unwrap();
            assert_eq!(record.flag("doDetail").unwrap(), expected);
        }
    }

    #[test]
    fn should_pass_unknown_keys_through_unchanged() {
        let input = raw(json!({"sensorId": "s", "timestamp": 1, "value": 2, "note": {"a": [1, 2]}}));
        let record = validate(Operation::AddSensorData, &input).unwrap();
        assert_eq!(record.extra().len(), 1);
        assert_eq!(record.extra()["note"], json!({"a": [1, 2]}));
    }

    #[test]
    fn should_report_missing_when_taking_unset_required_field() {
        let mut record = ValidatedRecord::default();
        let err = record.string("id").unwrap_err();
        assert_eq!(err.messages(), ["missing value for id"]);
    }
}
