//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the profile store from validated configuration
//! - Build the HTTP server around it
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound last, so traffic only arrives once the store is ready

use tokio::net::TcpListener;

use crate::config::{ListenerConfig, ServerConfig};
use crate::http::HttpServer;
use crate::profile::{ProfileStore, StoreError};

/// Error type for startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to open profile store: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Connect the store and assemble the server.
pub async fn bootstrap(config: ServerConfig) -> Result<HttpServer, StartupError> {
    let store_config = config.store.clone();
    let store = tokio::task::spawn_blocking(move || ProfileStore::connect(&store_config))
        .await
        .map_err(StoreError::from)??;

    Ok(HttpServer::new(config, store))
}

/// Bind the TCP listener.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, StartupError> {
    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "Listening for connections");
    }
    Ok(listener)
}
