//! JSON handlers for sensor types.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use serde_json::Value;

use sensorhub_app::ports::RecordStore;
use sensorhub_domain::sensor_type::SensorType;
use sensorhub_domain::validate::RawRecord;

use super::links::{PageBody, segment};
use super::{CreateResponse, GetResponse, raw_body, raw_query};
use crate::error::ApiError;
use crate::state::AppState;

fn item_link(sensor_type: &SensorType) -> String {
    format!("/sensor-types/{}", segment(&sensor_type.id))
}

/// `GET /sensor-types`
pub async fn list<S>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<GetResponse<PageBody<SensorType>>, ApiError>
where
    S: RecordStore + Send + Sync + 'static,
{
    let page = state
        .sensor_service
        .find_sensor_types(&raw_query(params))
        .await?;
    Ok(GetResponse::Ok(Json(PageBody::new(page, &uri, item_link))))
}

/// `GET /sensor-types/{id}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
) -> Result<GetResponse<PageBody<SensorType>>, ApiError>
where
    S: RecordStore + Send + Sync + 'static,
{
    let search: RawRecord = [("id".to_string(), Value::String(id))].into_iter().collect();
    let page = state.sensor_service.find_sensor_types(&search).await?;
    Ok(GetResponse::Ok(Json(PageBody::new(page, &uri, item_link))))
}

/// `POST /sensor-types`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<CreateResponse<SensorType>, ApiError>
where
    S: RecordStore + Send + Sync + 'static,
{
    let record = raw_body(body)?;
    let created = state.sensor_service.add_sensor_type(&record).await?;
    Ok(CreateResponse::Created {
        location: item_link(&created),
        body: Json(created),
    })
}
