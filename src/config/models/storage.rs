//! Storage configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Where users, roles, permissions and audit entries live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialBackend {
    /// In-process tables, lost on restart
    Memory,
    /// SQL database through sea-orm
    #[default]
    Database,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: CredentialBackend,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Redis configuration, used by the shared counter backend
    #[serde(default)]
    pub redis: RedisConfig,
    /// Deadline for one credential store call
    #[serde(default = "default_store_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries after a timed-out call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: CredentialBackend::default(),
            database: DatabaseConfig::default(),
            redis: RedisConfig::default(),
            timeout_ms: default_store_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("Storage timeout must be greater than 0".to_string());
        }
        if self.backend == CredentialBackend::Database && self.database.url.is_empty() {
            return Err("Database URL is required for the database backend".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Run migrations on startup
    #[serde(default = "super::default_true")]
    pub migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
            migrate: true,
        }
    }
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://data/authgate.db?mode=rwc".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    5
}
