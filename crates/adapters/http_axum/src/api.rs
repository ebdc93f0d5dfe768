//! JSON web service handler modules.

pub mod links;
#[allow(clippy::missing_errors_doc)]
pub mod sensor_data;
#[allow(clippy::missing_errors_doc)]
pub mod sensor_types;
#[allow(clippy::missing_errors_doc)]
pub mod sensors;

use std::collections::BTreeMap;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use serde_json::Value;

use sensorhub_app::ports::RecordStore;
use sensorhub_domain::validate::RawRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the registry routes.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: RecordStore + Send + Sync + 'static,
{
    Router::new()
        // Sensor types
        .route(
            "/sensor-types",
            get(sensor_types::list::<S>).post(sensor_types::create::<S>),
        )
        .route("/sensor-types/{id}", get(sensor_types::get::<S>))
        // Sensors
        .route("/sensors", get(sensors::list::<S>).post(sensors::create::<S>))
        .route("/sensors/{id}", get(sensors::get::<S>))
        // Readings
        .route(
            "/sensor-data/{sensor_id}",
            get(sensor_data::list::<S>).post(sensor_data::create::<S>),
        )
        .route(
            "/sensor-data/{sensor_id}/{timestamp}",
            get(sensor_data::get::<S>),
        )
}

/// Query string parameters as a raw record of string values.
fn raw_query(params: BTreeMap<String, String>) -> RawRecord {
    params
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect()
}

/// Request body as a raw record; anything but a JSON object is rejected.
fn raw_body(body: Result<Json<Value>, JsonRejection>) -> Result<RawRecord, ApiError> {
    match body {
        Ok(Json(Value::Object(record))) => Ok(record),
        Ok(Json(_)) => Err(ApiError::bad_request("request body must be a JSON object")),
        Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
    }
}

/// Possible responses from the create endpoints.
pub enum CreateResponse<T> {
    Created { location: String, body: Json<T> },
}

impl<T: Serialize> IntoResponse for CreateResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Created { location, body } => match HeaderValue::try_from(location) {
                Ok(location) => {
                    (StatusCode::CREATED, [(header::LOCATION, location)], body).into_response()
                }
                Err(_) => (StatusCode::CREATED, body).into_response(),
            },
        }
    }
}

/// Possible responses from the read endpoints.
pub enum GetResponse<T> {
    Ok(Json<T>),
}

impl<T: Serialize> IntoResponse for GetResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}
