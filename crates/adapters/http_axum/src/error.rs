//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use sensorhub_domain::error::{SensorHubError, ValidationError};

/// One entry of an error body.
#[derive(Serialize)]
struct ErrorEntry {
    code: &'static str,
    message: String,
}

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    errors: Vec<ErrorEntry>,
}

/// Maps [`SensorHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(SensorHubError);

impl ApiError {
    /// Reject a malformed request before it reaches the service.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(ValidationError::single(message).into())
    }
}

impl From<SensorHubError> for ApiError {
    fn from(err: SensorHubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match self.0 {
            SensorHubError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                err.into_messages()
                    .into_iter()
                    .map(|message| ErrorEntry {
                        code: "BAD_VALUE",
                        message,
                    })
                    .collect(),
            ),
            SensorHubError::Reference(err) => (
                StatusCode::BAD_REQUEST,
                vec![ErrorEntry {
                    code: "X_ID",
                    message: err.to_string(),
                }],
            ),
            SensorHubError::NotFound(err) => (
                StatusCode::NOT_FOUND,
                vec![ErrorEntry {
                    code: "NOT_FOUND",
                    message: err.to_string(),
                }],
            ),
            SensorHubError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![ErrorEntry {
                        code: "SERVER_ERROR",
                        message: "internal server error".to_string(),
                    }],
                )
            }
        };

        (status, Json(ErrorBody { errors })).into_response()
    }
}
