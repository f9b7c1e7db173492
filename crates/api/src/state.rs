use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Pooled client for the inventory backend.
    pub backend: Arc<BackendClient>,
}

impl AppState {
    /// Build state from configuration, creating the backend client.
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let backend = BackendClient::new(
            &config.backend_url,
            std::time::Duration::from_secs(config.upstream_timeout_secs),
        )?;
        Ok(Self {
            config: Arc::new(config),
            backend: Arc::new(backend),
        })
    }
}
