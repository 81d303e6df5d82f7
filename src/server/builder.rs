//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::storage::StorageLayer;
use crate::utils::error::{GatewayError, Result};
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    storage: Option<StorageLayer>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use these stores instead of connecting the configured ones
    pub fn with_storage(mut self, storage: StorageLayer) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        match self.storage {
            Some(storage) => HttpServer::with_storage(&config, storage).await,
            None => HttpServer::new(&config).await,
        }
    }
}

/// Build the server for `config` and serve until shutdown
pub async fn run_server(config: Config) -> Result<()> {
    info!(
        "Starting authgate {} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.environment()
    );

    let server = ServerBuilder::new().with_config(config).build().await?;
    info!("Public routes: {:?}", server.state().public_routes.patterns());

    server.start().await
}
