//! Storage port — a keyed document store.
//!
//! Documents are JSON values grouped in named collections. The store knows
//! nothing about sensors: decoding, ordering and integrity checks all happen
//! in the service layer.

use std::fmt;
use std::future::Future;

use serde_json::Value;

use sensorhub_domain::error::SensorHubError;

/// A named group of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Collection {
    SensorTypes,
    Sensors,
    /// The reading log of one sensor, keyed by timestamp.
    Readings(String),
}

impl Collection {
    /// Stable name used by persistent stores.
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorTypes => f.write_str("sensor-types"),
            Self::Sensors => f.write_str("sensors"),
            Self::Readings(sensor_id) => write!(f, "readings/{sensor_id}"),
        }
    }
}

/// Document store backing the sensor registry.
///
/// A single `put` must be atomic: a concurrent reader observes either the
/// previous or the new document, never a mix.
pub trait RecordStore {
    /// Fetch the document stored under `key`.
    fn get(
        &self,
        collection: &Collection,
        key: &str,
    ) -> impl Future<Output = Result<Option<Value>, SensorHubError>> + Send;

    /// Insert or fully replace the document stored under `key`.
    fn put(
        &self,
        collection: &Collection,
        key: &str,
        document: Value,
    ) -> impl Future<Output = Result<(), SensorHubError>> + Send;

    /// Every document of a collection, in no particular order.
    fn scan(
        &self,
        collection: &Collection,
    ) -> impl Future<Output = Result<Vec<Value>, SensorHubError>> + Send;

    /// Remove every document of every collection.
    fn clear(&self) -> impl Future<Output = Result<(), SensorHubError>> + Send;
}
