//! # sensorhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON web service** over the sensor registry
//!   (`/sensor-types`, `/sensors`, `/sensor-data/{sensorId}`, …)
//! - Map query strings and request bodies into raw records for the
//!   application service (driving adapter)
//! - Decorate results with `self`/`next` links and map errors to
//!   `{"errors": [{"code", "message"}]}` bodies
//!
//! ## Dependency rule
//! Depends on `sensorhub-app` (for the port trait and service) and
//! `sensorhub-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
