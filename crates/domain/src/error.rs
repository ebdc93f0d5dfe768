//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SensorHubError`] via `#[from]` or a `From` impl.

/// Top-level error returned by every sensorhub operation.
#[derive(Debug, thiserror::Error)]
pub enum SensorHubError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// One or more field-level problems found while validating an input record.
///
/// Always carries the complete list of messages, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .messages.join("; "))]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    /// Build an error from a list of messages.
    ///
    /// The list is expected to be non-empty; callers only construct this
    /// error once at least one problem was recorded.
    #[must_use]
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// Build an error carrying a single message.
    #[must_use]
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// A foreign-key field names a record that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {id} does not name an existing {entity}")]
pub struct ReferenceError {
    /// Kind of record the reference should point to (e.g. `"sensor type"`).
    pub entity: &'static str,
    /// Name of the referencing field (e.g. `"model"`).
    pub field: &'static str,
    pub id: String,
}

/// An exact-id lookup found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no {entity} found for id {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_join_all_messages_when_displaying_validation_error() {
        let err = ValidationError::new(vec![
            "missing value for id".to_string(),
            "missing value for unit".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "missing value for id; missing value for unit"
        );
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn should_convert_validation_error_into_top_level_error() {
        let err: SensorHubError = ValidationError::single("bad").into();
        assert!(matches!(err, SensorHubError::Validation(_)));
    }

    #[test]
    fn should_describe_dangling_reference() {
        let err = ReferenceError {
            entity: "sensor type",
            field: "model",
            id: "t-42".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "model t-42 does not name an existing sensor type"
        );
    }

    #[test]
    fn should_describe_missing_record() {
        let err: SensorHubError = NotFoundError {
            entity: "sensor",
            id: "s-1".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "no sensor found for id s-1");
    }
}
