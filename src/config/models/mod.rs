//! Configuration data models
//!
//! This module defines all configuration structures used throughout the service.

#![allow(missing_docs)]

pub mod audit;
pub mod auth;
pub mod bootstrap;
pub mod gateway;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod storage;

pub use audit::*;
pub use auth::*;
pub use bootstrap::*;
pub use gateway::*;
pub use rate_limit::*;
pub use routes::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default backing store call deadline in milliseconds
pub fn default_store_timeout_ms() -> u64 {
    2000
}

/// Default number of retries after a store timeout
pub fn default_max_retries() -> u32 {
    1
}

pub(crate) fn default_true() -> bool {
    true
}
