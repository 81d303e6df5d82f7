//! Redis connection management

use crate::config::RedisConfig;
use crate::utils::error::{GatewayError, Result};
use redis::{Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Reconnecting Redis connection shared by all requests
#[derive(Clone)]
pub struct RedisPool {
    pub(super) connection: ConnectionManager,
    pub(super) config: RedisConfig,
}

impl RedisPool {
    /// Connect to Redis
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        info!("Creating Redis connection");
        debug!("Redis URL: {}", crate::utils::sanitize_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(GatewayError::Redis)?;

        let connection = tokio::time::timeout(
            Duration::from_secs(config.connection_timeout.max(1)),
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| GatewayError::timeout("redis connect"))?
        .map_err(GatewayError::Redis)?;

        info!("Redis connection established");
        Ok(Self {
            connection,
            config: config.clone(),
        })
    }

    pub(super) fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }

    /// Round-trip a PING
    pub async fn ping(&self) -> Result<()> {
        debug!("Performing Redis health check");
        let mut conn = self.connection();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(GatewayError::Redis)?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("url", &crate::utils::sanitize_url(&self.config.url))
            .finish()
    }
}
