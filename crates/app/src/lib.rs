//! # sensorhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **storage port** that adapters must implement:
//!   - `RecordStore` — get/put/scan JSON documents by collection and key
//! - Define the **driving/inbound** use-case struct:
//!   - `SensorService` — validated add & find operations over sensor types,
//!     sensors and readings, enforcing referential integrity
//! - Implement the **query engine** (sorting, filtering, pagination, status
//!   annotation) on top of the storage port
//! - Provide **in-process infrastructure** (an in-memory store) that doesn't
//!   need IO
//!
//! ## Dependency rule
//! Depends on `sensorhub-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod memory_store;
pub mod ports;
pub mod query;
pub mod services;
