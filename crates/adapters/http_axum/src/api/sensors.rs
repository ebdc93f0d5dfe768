//! JSON handlers for sensors.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use serde_json::Value;

use sensorhub_app::ports::RecordStore;
use sensorhub_domain::page::SensorDetail;
use sensorhub_domain::sensor::Sensor;
use sensorhub_domain::validate::RawRecord;

use super::links::{PageBody, segment};
use super::{CreateResponse, GetResponse, raw_body, raw_query};
use crate::error::ApiError;
use crate::state::AppState;

fn sensor_link(sensor: &Sensor) -> String {
    format!("/sensors/{}", segment(&sensor.id))
}

fn item_link(detail: &SensorDetail) -> String {
    sensor_link(&detail.sensor)
}

/// `GET /sensors`
pub async fn list<S>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<GetResponse<PageBody<SensorDetail>>, ApiError>
where
    S: RecordStore + Send + Sync + 'static,
{
    let page = state
        .sensor_service
        .find_sensors(&raw_query(params))
        .await?;
    Ok(GetResponse::Ok(Json(PageBody::new(page, &uri, item_link))))
}

/// `GET /sensors/{id}`
///
/// Query parameters other than `id` (e.g. `doDetail`) are honoured.
pub async fn get<S>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<GetResponse<PageBody<SensorDetail>>, ApiError>
where
    S: RecordStore + Send + Sync + 'static,
{
    let mut search: RawRecord = raw_query(params);
    search.insert("id".to_string(), Value::String(id));
    let page = state.sensor_service.find_sensors(&search).await?;
    Ok(GetResponse::Ok(Json(PageBody::new(page, &uri, item_link))))
}

/// `POST /sensors`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<CreateResponse<Sensor>, ApiError>
where
    S: RecordStore + Send + Sync + 'static,
{
    let record = raw_body(body)?;
    let created = state.sensor_service.add_sensor(&record).await?;
    Ok(CreateResponse::Created {
        location: sensor_link(&created),
        body: Json(created),
    })
}
