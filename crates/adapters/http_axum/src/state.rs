//! Shared application state for axum handlers.

use std::sync::Arc;

use sensorhub_app::ports::RecordStore;
use sensorhub_app::services::sensor_service::SensorService;

/// Application state shared across all axum handlers.
///
/// Generic over the store type to avoid dynamic dispatch. `Clone` is
/// implemented manually so the store itself does not need to be `Clone`.
pub struct AppState<S> {
    /// Sensor registry service.
    pub sensor_service: Arc<SensorService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            sensor_service: Arc::clone(&self.sensor_service),
        }
    }
}

impl<S> AppState<S>
where
    S: RecordStore + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(sensor_service: SensorService<S>) -> Self {
        Self::from_arc(Arc::new(sensor_service))
    }

    /// Create a new application state from a pre-wrapped `Arc` service.
    pub fn from_arc(sensor_service: Arc<SensorService<S>>) -> Self {
        Self { sensor_service }
    }
}
