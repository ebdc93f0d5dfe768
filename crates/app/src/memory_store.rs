//! In-process document store backed by hash maps.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use sensorhub_domain::error::SensorHubError;

use crate::ports::{Collection, RecordStore};

type Documents = HashMap<Collection, HashMap<String, Value>>;

/// [`RecordStore`] keeping every document in memory.
///
/// Each call takes the lock once, so a `put` is atomic per key. Nothing
/// survives a restart.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<Documents>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Documents> {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Documents> {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for InMemoryStore {
    fn get(
        &self,
        collection: &Collection,
        key: &str,
    ) -> impl Future<Output = Result<Option<Value>, SensorHubError>> + Send {
        let document = self
            .read()
            .get(collection)
            .and_then(|documents| documents.get(key))
            .cloned();
        async move { Ok(document) }
    }

    fn put(
        &self,
        collection: &Collection,
        key: &str,
        document: Value,
    ) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        self.write()
            .entry(collection.clone())
            .or_default()
            .insert(key.to_string(), document);
        async { Ok(()) }
    }

    fn scan(
        &self,
        collection: &Collection,
    ) -> impl Future<Output = Result<Vec<Value>, SensorHubError>> + Send {
        let documents: Vec<Value> = self
            .read()
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default();
        async move { Ok(documents) }
    }

    fn clear(&self) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        self.write().clear();
        async { Ok(()) }
    }
}
