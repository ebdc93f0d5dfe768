//! Sensor service — the registry's caller API.
//!
//! Every operation takes a raw JSON object, validates it against its schema,
//! then reads or writes through the [`RecordStore`] port.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use sensorhub_domain::error::{NotFoundError, ReferenceError, SensorHubError};
use sensorhub_domain::page::{Page, ReadingPage, SensorDetail};
use sensorhub_domain::reading::{ClassifiedReading, Reading};
use sensorhub_domain::search::{SensorDataSearch, SensorSearch, SensorTypeSearch};
use sensorhub_domain::sensor::Sensor;
use sensorhub_domain::sensor_type::SensorType;
use sensorhub_domain::status::classify;
use sensorhub_domain::validate::RawRecord;

use crate::ports::{Collection, RecordStore};
use crate::query;

const SENSOR_TYPE: &str = "sensor type";
const SENSOR: &str = "sensor";
const READING: &str = "reading";

/// Application service for sensor types, sensors and their readings.
pub struct SensorService<S> {
    store: S,
}

impl<S: RecordStore> SensorService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Add or replace a sensor type.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when the record is malformed,
    /// or a storage error propagated from the store.
    #[tracing::instrument(skip(self, raw))]
    pub async fn add_sensor_type(&self, raw: &RawRecord) -> Result<SensorType, SensorHubError> {
        let sensor_type = SensorType::from_raw(raw)?;
        self.store
            .put(
                &Collection::SensorTypes,
                &sensor_type.id,
                encode(&sensor_type)?,
            )
            .await?;
        tracing::debug!(id = %sensor_type.id, "sensor type upserted");
        Ok(sensor_type)
    }

    /// Add or replace a sensor; its `model` must name a known sensor type.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when the record is malformed,
    /// [`SensorHubError::Reference`] when the sensor type is unknown, or a
    /// storage error propagated from the store.
    #[tracing::instrument(skip(self, raw))]
    pub async fn add_sensor(&self, raw: &RawRecord) -> Result<Sensor, SensorHubError> {
        let sensor = Sensor::from_raw(raw)?;
        if self
            .store
            .get(&Collection::SensorTypes, &sensor.model)
            .await?
            .is_none()
        {
            tracing::warn!(id = %sensor.id, model = %sensor.model, "unknown sensor type");
            return Err(ReferenceError {
                entity: SENSOR_TYPE,
                field: "model",
                id: sensor.model,
            }
            .into());
        }
        self.store
            .put(&Collection::Sensors, &sensor.id, encode(&sensor)?)
            .await?;
        tracing::debug!(id = %sensor.id, "sensor upserted");
        Ok(sensor)
    }

    /// Add or replace the reading of a sensor at a timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when the record is malformed,
    /// [`SensorHubError::Reference`] when the sensor is unknown, or a storage
    /// error propagated from the store.
    #[tracing::instrument(skip(self, raw))]
    pub async fn add_sensor_data(&self, raw: &RawRecord) -> Result<Reading, SensorHubError> {
        let reading = Reading::from_raw(raw)?;
        if self
            .store
            .get(&Collection::Sensors, &reading.sensor_id)
            .await?
            .is_none()
        {
            tracing::warn!(sensor_id = %reading.sensor_id, "unknown sensor");
            return Err(ReferenceError {
                entity: SENSOR,
                field: "sensorId",
                id: reading.sensor_id,
            }
            .into());
        }
        let collection = Collection::Readings(reading.sensor_id.clone());
        self.store
            .put(&collection, &reading.key(), encode(&reading)?)
            .await?;
        tracing::debug!(
            sensor_id = %reading.sensor_id,
            timestamp = reading.timestamp,
            "reading upserted"
        );
        Ok(reading)
    }

    /// Find sensor types by id, or page through them with optional filters.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when the search is malformed,
    /// [`SensorHubError::NotFound`] when a given `id` is unknown, or a
    /// storage error propagated from the store.
    #[tracing::instrument(skip(self, raw))]
    pub async fn find_sensor_types(
        &self,
        raw: &RawRecord,
    ) -> Result<Page<SensorType>, SensorHubError> {
        let search = SensorTypeSearch::from_raw(raw)?;
        let page = match search.id {
            Some(id) => query::single(self.sensor_type(&id).await?, search.paging),
            None => query::select(
                self.load(&Collection::SensorTypes).await?,
                search.paging,
                &search.filter,
            ),
        };
        tracing::debug!(found = page.data.len(), next_index = page.next_index, "sensor types");
        Ok(page)
    }

    /// Find sensors by id, or page through them with optional filters.
    ///
    /// With `doDetail`, each sensor carries its sensor type when it exists.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when the search is malformed,
    /// [`SensorHubError::NotFound`] when a given `id` is unknown, or a
    /// storage error propagated from the store.
    #[tracing::instrument(skip(self, raw))]
    pub async fn find_sensors(
        &self,
        raw: &RawRecord,
    ) -> Result<Page<SensorDetail>, SensorHubError> {
        let search = SensorSearch::from_raw(raw)?;
        let page = match search.id {
            Some(id) => query::single(self.sensor(&id).await?, search.paging),
            None => query::select(
                self.load(&Collection::Sensors).await?,
                search.paging,
                &search.filter,
            ),
        };

        let mut data = Vec::with_capacity(page.data.len());
        for sensor in page.data {
            let sensor_type = if search.do_detail {
                self.load_one(&Collection::SensorTypes, &sensor.model)
                    .await?
            } else {
                None
            };
            data.push(SensorDetail {
                sensor,
                sensor_type,
            });
        }
        tracing::debug!(found = data.len(), next_index = page.next_index, "sensors");
        Ok(Page {
            data,
            next_index: page.next_index,
        })
    }

    /// Latest readings of a sensor, newest first, classified by status.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when the search is malformed,
    /// [`SensorHubError::NotFound`] when the sensor or its type is unknown,
    /// or a storage error propagated from the store.
    #[tracing::instrument(skip(self, raw))]
    pub async fn find_sensor_data(&self, raw: &RawRecord) -> Result<ReadingPage, SensorHubError> {
        let search = SensorDataSearch::from_raw(raw)?;
        let sensor = self.sensor(&search.sensor_id).await?;
        let sensor_type = self.sensor_type(&sensor.model).await?;
        let readings = self
            .load(&Collection::Readings(sensor.id.clone()))
            .await?;

        let data = query::latest_readings(readings, &search, &sensor_type.limits, &sensor.expected);
        tracing::debug!(sensor_id = %sensor.id, found = data.len(), "readings");

        Ok(if search.do_detail {
            ReadingPage {
                data,
                sensor_type: Some(sensor_type),
                sensor: Some(sensor),
            }
        } else {
            ReadingPage {
                data,
                sensor_type: None,
                sensor: None,
            }
        })
    }

    /// The reading of a sensor at exactly `timestamp`, whatever its status.
    ///
    /// Takes the same record as [`find_sensor_data`](Self::find_sensor_data);
    /// `count`, `statuses` and `doDetail` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when the search is malformed,
    /// [`SensorHubError::NotFound`] when the sensor, its type or the reading
    /// is unknown, or a storage error propagated from the store.
    #[tracing::instrument(skip(self, raw))]
    pub async fn find_reading(&self, raw: &RawRecord) -> Result<ClassifiedReading, SensorHubError> {
        let search = SensorDataSearch::from_raw(raw)?;
        let sensor = self.sensor(&search.sensor_id).await?;
        let sensor_type = self.sensor_type(&sensor.model).await?;
        let key = search.timestamp.to_string();
        let reading: Reading = self
            .load_one(&Collection::Readings(sensor.id.clone()), &key)
            .await?
            .ok_or_else(|| not_found(READING, &format!("{}/{key}", sensor.id)))?;

        Ok(ClassifiedReading {
            timestamp: reading.timestamp,
            value: reading.value,
            status: classify(reading.value, &sensor_type.limits, &sensor.expected),
        })
    }

    /// Remove every sensor type, sensor and reading.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn clear(&self) -> Result<(), SensorHubError> {
        self.store.clear().await?;
        tracing::debug!("store cleared");
        Ok(())
    }

    async fn sensor_type(&self, id: &str) -> Result<SensorType, SensorHubError> {
        self.load_one(&Collection::SensorTypes, id)
            .await?
            .ok_or_else(|| not_found(SENSOR_TYPE, id))
    }

    async fn sensor(&self, id: &str) -> Result<Sensor, SensorHubError> {
        self.load_one(&Collection::Sensors, id)
            .await?
            .ok_or_else(|| not_found(SENSOR, id))
    }

    async fn load_one<T: DeserializeOwned>(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<Option<T>, SensorHubError> {
        self.store
            .get(collection, key)
            .await?
            .map(decode)
            .transpose()
    }

    async fn load<T: DeserializeOwned>(
        &self,
        collection: &Collection,
    ) -> Result<Vec<T>, SensorHubError> {
        self.store
            .scan(collection)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}

fn not_found(entity: &'static str, id: &str) -> SensorHubError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

fn encode<T: Serialize>(record: &T) -> Result<Value, SensorHubError> {
    serde_json::to_value(record).map_err(|err| SensorHubError::Storage(Box::new(err)))
}

fn decode<T: DeserializeOwned>(document: Value) -> Result<T, SensorHubError> {
    serde_json::from_value(document).map_err(|err| SensorHubError::Storage(Box::new(err)))
}
