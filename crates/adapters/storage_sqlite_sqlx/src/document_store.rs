//! `SQLite` implementation of [`RecordStore`].

use std::future::Future;

use serde_json::Value;
use sqlx::SqlitePool;

use sensorhub_app::ports::{Collection, RecordStore};
use sensorhub_domain::error::SensorHubError;

use crate::error::StorageError;

const UPSERT: &str = "INSERT INTO documents (collection, key, body) VALUES (?, ?, ?) \
     ON CONFLICT (collection, key) DO UPDATE SET body = excluded.body";
const SELECT_BY_KEY: &str = "SELECT body FROM documents WHERE collection = ? AND key = ?";
const SELECT_BY_COLLECTION: &str = "SELECT body FROM documents WHERE collection = ?";
const DELETE_ALL: &str = "DELETE FROM documents";

/// `SQLite`-backed document store.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse(body: &str) -> Result<Value, StorageError> {
    Ok(serde_json::from_str(body)?)
}

impl RecordStore for SqliteRecordStore {
    fn get(
        &self,
        collection: &Collection,
        key: &str,
    ) -> impl Future<Output = Result<Option<Value>, SensorHubError>> + Send {
        let pool = self.pool.clone();
        let collection = collection.name();
        let key = key.to_string();
        async move {
            let body: Option<String> = sqlx::query_scalar(SELECT_BY_KEY)
                .bind(collection)
                .bind(key)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            body.as_deref()
                .map(parse)
                .transpose()
                .map_err(SensorHubError::from)
        }
    }

    fn put(
        &self,
        collection: &Collection,
        key: &str,
        document: Value,
    ) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        let pool = self.pool.clone();
        let collection = collection.name();
        let key = key.to_string();
        async move {
            sqlx::query(UPSERT)
                .bind(collection)
                .bind(key)
                .bind(document.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn scan(
        &self,
        collection: &Collection,
    ) -> impl Future<Output = Result<Vec<Value>, SensorHubError>> + Send {
        let pool = self.pool.clone();
        let collection = collection.name();
        async move {
            let bodies: Vec<String> = sqlx::query_scalar(SELECT_BY_COLLECTION)
                .bind(collection)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let documents = bodies
                .iter()
                .map(|body| parse(body))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(documents)
        }
    }

    fn clear(&self) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_ALL)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use serde_json::json;

    async fn setup() -> SqliteRecordStore {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteRecordStore::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_round_trip_document_when_stored() {
        let store = setup().await;
        let document = json!({
            "id": "t-1",
            "limits": {"min": -40.5, "max": 125},
            "tags": ["indoor", "cellar"],
        });
        store
            .put(&Collection::SensorTypes, "t-1", document.clone())
            .await
            .unwrap();

        let found = store.get(&Collection::SensorTypes, "t-1").await.unwrap();
        assert_eq!(found, Some(document));
    }

    #[tokio::test]
    async fn should_return_none_when_key_missing() {
        let store = setup().await;
        let found = store.get(&Collection::Sensors, "nope").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn should_replace_body_when_key_is_reused() {
        let store = setup().await;
        let readings = Collection::Readings("s-1".to_string());
        store.put(&readings, "10", json!({"value": 1.5})).await.unwrap();
        store.put(&readings, "10", json!({"value": 2.5})).await.unwrap();

        let all = store.scan(&readings).await.unwrap();
        assert_eq!(all, [json!({"value": 2.5})]);
    }

    #[tokio::test]
    async fn should_keep_collections_apart_when_keys_collide() {
        let store = setup().await;
        store
            .put(&Collection::SensorTypes, "x", json!("type"))
            .await
            .unwrap();
        store
            .put(&Collection::Sensors, "x", json!("sensor"))
            .await
            .unwrap();

        assert_eq!(
            store.get(&Collection::SensorTypes, "x").await.unwrap(),
            Some(json!("type"))
        );
        assert_eq!(store.scan(&Collection::Sensors).await.unwrap(), [json!("sensor")]);
    }

    #[tokio::test]
    async fn should_surface_storage_error_when_body_is_corrupt() {
        let store = setup().await;
        sqlx::query("INSERT INTO documents (collection, key, body) VALUES ('sensors', 's', '{')")
            .execute(&store.pool)
            .await
            .unwrap();

        let result = store.get(&Collection::Sensors, "s").await;
        assert!(matches!(result, Err(SensorHubError::Storage(_))));
    }

    #[tokio::test]
    async fn should_empty_every_collection_when_cleared() {
        let store = setup().await;
        store.put(&Collection::Sensors, "s", json!({})).await.unwrap();
        store
            .put(&Collection::Readings("s".to_string()), "1", json!({}))
            .await
            .unwrap();

        store.clear().await.unwrap();

        assert!(store.scan(&Collection::Sensors).await.unwrap().is_empty());
        assert!(
            store
                .scan(&Collection::Readings("s".to_string()))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
