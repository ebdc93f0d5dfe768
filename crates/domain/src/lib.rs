//! # sensorhub-domain
//!
//! Pure domain model for the sensorhub telemetry registry.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, numeric ranges, reading statuses
//! - Define the **schema registry**: per-operation field specifications
//! - **Validate** raw, partially-specified input records into typed records
//! - Define **Sensor types** (device models with hard limits)
//! - Define **Sensors** (deployed devices with an expected range)
//! - Define **Readings** (timestamped samples) and their status classification
//! - Define **search specs** and result pages for the query operations
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod range;
pub mod schema;
pub mod status;
pub mod validate;

pub mod page;
pub mod reading;
pub mod search;
pub mod sensor;
pub mod sensor_type;
