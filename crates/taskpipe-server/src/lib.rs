//! Taskpipe Server
//!
//! HTTP surface for the fetch → extract → normalize pipeline: one
//! parameterized list endpoint plus a health check. Wires the upstream
//! client, the field catalog, the optional Redis cache and the optional
//! SQLite store into shared application state.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::AppConfig;
use handlers::{connect_cache_or_disable, create_router, AppState};
use std::sync::{Arc, Mutex};
use taskpipe_client::{ApiError, HttpTransport};
use taskpipe_extractor::FieldCatalog;
use taskpipe_normalizer::{parse_timezone, NormalizeError};
use taskpipe_store::{StoreError, TaskStore};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The configured timezone is unknown
    #[error("Timezone error: {0}")]
    Timezone(#[from] NormalizeError),

    /// Upstream client could not be constructed
    #[error("Client error: {0}")]
    Client(#[from] ApiError),

    /// The configured database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the taskpipe HTTP server
///
/// Resolves the timezone, compiles the field catalog, connects the optional
/// cache (degrading to no-cache when unreachable), opens the optional store,
/// and starts the axum server.
pub async fn start_server(config: AppConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting taskpipe server");
    info!("Bind address: {}", config.bind_addr());
    info!("Timezone: {}", config.timezone);
    info!("Status-duration sub-fetch: {}", config.fetch_time_in_status);

    let timezone = parse_timezone(&config.timezone)?;
    let catalog = Arc::new(FieldCatalog::production());
    let transport = Arc::new(HttpTransport::new(&config.client_config())?);

    let cache = connect_cache_or_disable(&config).await;

    let store = match &config.database {
        Some(section) => {
            let store = TaskStore::new(&section.path)?;
            info!(path = %section.path, "persistence enabled");
            Some(Arc::new(Mutex::new(store)))
        }
        None => None,
    };

    let state = AppState {
        config: Arc::new(config),
        timezone,
        catalog,
        transport,
        cache,
        store,
    };

    let app = create_router(state.clone());

    // Bind and serve
    let listener = TcpListener::bind(state.config.bind_addr()).await?;
    info!("Server listening on {}", state.config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
