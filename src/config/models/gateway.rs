//! Top-level service configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Deployment environment, drives how strictly insecure settings are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Sandbox,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Logging output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of the human format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Apply `AUTHGATE_*` environment overrides on top of the current values
    pub fn apply_env_overrides(&mut self) -> crate::utils::error::Result<()> {
        if let Ok(secret) = std::env::var("AUTHGATE_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(url) = std::env::var("AUTHGATE_DATABASE_URL") {
            self.storage.database.url = url;
        }
        if let Ok(url) = std::env::var("AUTHGATE_REDIS_URL") {
            self.storage.redis.url = url;
        }
        if let Ok(host) = std::env::var("AUTHGATE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("AUTHGATE_PORT") {
            self.server.port = port.parse().map_err(|_| {
                crate::utils::error::GatewayError::config(format!(
                    "Invalid AUTHGATE_PORT: {}",
                    port
                ))
            })?;
        }
        if let Ok(env) = std::env::var("AUTHGATE_ENVIRONMENT") {
            self.environment = serde_yaml::from_str(&env).map_err(|_| {
                crate::utils::error::GatewayError::config(format!(
                    "Invalid AUTHGATE_ENVIRONMENT: {}",
                    env
                ))
            })?;
        }
        Ok(())
    }
}
