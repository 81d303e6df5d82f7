//! Configuration management
//!
//! This module handles loading, validation, and management of all service configuration.

pub mod models;

pub use models::*;

use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let mut gateway: GatewayConfig = serde_yaml::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;
        gateway.apply_env_overrides()?;

        let config = Self { gateway };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut gateway = GatewayConfig::default();
        gateway.apply_env_overrides()?;

        let config = Self { gateway };
        config.validate()?;
        Ok(config)
    }

    pub fn environment(&self) -> Environment {
        self.gateway.environment
    }

    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.gateway.auth
    }

    pub fn rate_limit(&self) -> &RateLimitConfig {
        &self.gateway.rate_limit
    }

    pub fn routes(&self) -> &RoutesConfig {
        &self.gateway.routes
    }

    pub fn audit(&self) -> &AuditConfig {
        &self.gateway.audit
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.gateway.storage
    }

    pub fn bootstrap(&self) -> &BootstrapConfig {
        &self.gateway.bootstrap
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.gateway.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.gateway
            .server
            .validate()
            .map_err(|e| GatewayError::Config(format!("Server config error: {}", e)))?;

        self.gateway
            .auth
            .validate()
            .map_err(|e| GatewayError::Config(format!("Auth config error: {}", e)))?;

        self.gateway
            .rate_limit
            .validate()
            .map_err(|e| GatewayError::Config(format!("Rate limit config error: {}", e)))?;

        self.gateway
            .audit
            .validate()
            .map_err(|e| GatewayError::Config(format!("Audit config error: {}", e)))?;

        self.gateway
            .storage
            .validate()
            .map_err(|e| GatewayError::Config(format!("Storage config error: {}", e)))?;

        self.gateway
            .bootstrap
            .validate()
            .map_err(|e| GatewayError::Config(format!("Bootstrap config error: {}", e)))?;

        crate::config::models::auth::check_insecure_config(
            &self.gateway.auth,
            self.gateway.environment,
        )
        .map_err(|e| GatewayError::Config(format!("Auth config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Configuration as JSON with every secret replaced
    pub fn redacted(&self) -> Result<serde_json::Value> {
        let mut value = serde_json::to_value(&self.gateway)?;
        redact_secrets(&mut value);
        Ok(value)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.gateway)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn redact_secrets(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                let lowered = key.to_ascii_lowercase();
                if lowered.contains("secret") || lowered.contains("password") {
                    *inner = serde_json::Value::String("********".to_string());
                } else if lowered == "url" {
                    if let Some(raw) = inner.as_str() {
                        *inner = serde_json::Value::String(crate::utils::sanitize_url(raw));
                    }
                } else {
                    redact_secrets(inner);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact_secrets),
        _ => {}
    }
}
