//! JSON handlers for sensor readings.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use serde::Serialize;
use serde_json::Value;

use sensorhub_app::ports::RecordStore;
use sensorhub_domain::reading::{ClassifiedReading, Reading};
use sensorhub_domain::sensor::Sensor;
use sensorhub_domain::sensor_type::SensorType;
use sensorhub_domain::validate::RawRecord;

use super::links::{Linked, request_link, segment};
use super::{CreateResponse, GetResponse, raw_body, raw_query};
use crate::error::ApiError;
use crate::state::AppState;

/// Readings of one sensor, each linked to its exact-timestamp resource.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingsBody {
    pub data: Vec<Linked<ClassifiedReading>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<SensorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor: Option<Sensor>,
    #[serde(rename = "self")]
    pub self_link: String,
}

fn reading_link(sensor_id: &str, timestamp: i64) -> String {
    format!("/sensor-data/{}/{timestamp}", segment(sensor_id))
}

fn linked(sensor_id: &str, reading: ClassifiedReading) -> Linked<ClassifiedReading> {
    Linked {
        self_link: reading_link(sensor_id, reading.timestamp),
        item: reading,
    }
}

/// `GET /sensor-data/{sensor_id}`
pub async fn list<S>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(sensor_id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<GetResponse<ReadingsBody>, ApiError>
where
    S: RecordStore + Send + Sync + 'static,
{
    let mut search = raw_query(params);
    search.insert("sensorId".to_string(), Value::String(sensor_id.clone()));
    let page = state.sensor_service.find_sensor_data(&search).await?;
    Ok(GetResponse::Ok(Json(ReadingsBody {
        data: page
            .data
            .into_iter()
            .map(|reading| linked(&sensor_id, reading))
            .collect(),
        sensor_type: page.sensor_type,
        sensor: page.sensor,
        self_link: request_link(&uri),
    })))
}

/// `GET /sensor-data/{sensor_id}/{timestamp}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path((sensor_id, timestamp)): Path<(String, String)>,
) -> Result<GetResponse<ReadingsBody>, ApiError>
where
    S: RecordStore + Send + Sync + 'static,
{
    let search: RawRecord = [
        ("sensorId".to_string(), Value::String(sensor_id.clone())),
        ("timestamp".to_string(), Value::String(timestamp)),
    ]
    .into_iter()
    .collect();
    let reading = state.sensor_service.find_reading(&search).await?;
    Ok(GetResponse::Ok(Json(ReadingsBody {
        data: vec![linked(&sensor_id, reading)],
        sensor_type: None,
        sensor: None,
        self_link: request_link(&uri),
    })))
}

/// `POST /sensor-data/{sensor_id}`
///
/// The path segment overrides any `sensorId` in the body.
pub async fn create<S>(
    State(state): State<AppState<S>>,
    Path(sensor_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<CreateResponse<Reading>, ApiError>
where
    S: RecordStore + Send + Sync + 'static,
{
    let mut record = raw_body(body)?;
    record.insert("sensorId".to_string(), Value::String(sensor_id));
    let created = state.sensor_service.add_sensor_data(&record).await?;
    Ok(CreateResponse::Created {
        location: reading_link(&created.sensor_id, created.timestamp),
        body: Json(created),
    })
}
