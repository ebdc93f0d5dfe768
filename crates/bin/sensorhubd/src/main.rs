//! # sensorhubd — sensorhub daemon
//!
//! Composition root that wires the adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize logging
//! - Pick the storage backend: `SQLite` (pool + migrations) or in-memory
//! - Construct the sensor service, injecting the store via the port trait
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sensorhub_adapter_http_axum::router;
use sensorhub_adapter_http_axum::state::AppState;
use sensorhub_adapter_storage_sqlite_sqlx::SqliteRecordStore;
use sensorhub_app::memory_store::InMemoryStore;
use sensorhub_app::ports::RecordStore;
use sensorhub_app::services::sensor_service::SensorService;

use crate::config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        backend = %config.storage.backend,
        "sensorhubd listening"
    );

    match config.storage.backend {
        StorageBackend::Sqlite => {
            let db = sensorhub_adapter_storage_sqlite_sqlx::Config {
                database_url: config.database_url().to_string(),
            }
            .build()
            .await?;
            serve(listener, SqliteRecordStore::new(db.pool().clone())).await
        }
        StorageBackend::Memory => serve(listener, InMemoryStore::new()).await,
    }
}

async fn serve<S>(listener: TcpListener, store: S) -> Result<(), Box<dyn std::error::Error>>
where
    S: RecordStore + Send + Sync + 'static,
{
    let app = router::build(AppState::new(SensorService::new(store)));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("sensorhubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown requested");
}
