//! # sensorhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the [`RecordStore`](sensorhub_app::ports::RecordStore) port
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//!
//! Every document lives in a single `documents` table keyed by
//! `(collection, key)`, its body stored as JSON text.
//!
//! ## Dependency rule
//! Depends on `sensorhub-app` (for the port trait) and `sensorhub-domain`
//! (for the error type). The `app` and `domain` crates must never reference
//! this adapter.

pub mod document_store;
pub mod error;
pub mod pool;

pub use document_store::SqliteRecordStore;
pub use pool::{Config, Database};
