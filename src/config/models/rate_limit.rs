//! Rate limiting configuration

use crate::core::rate_limiter::RateLimitPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where fixed-window counters live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterBackend {
    /// Process-local counters, correct for a single instance only
    #[default]
    Memory,
    /// Shared counters in Redis, correct across instances
    Redis,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "super::default_true")]
    pub enabled: bool,
    /// Policy for anonymous callers and users without roles; `null` means unlimited
    #[serde(default = "default_anonymous_policy")]
    pub default_policy: Option<RateLimitPolicy>,
    /// Counter store backend
    #[serde(default)]
    pub backend: CounterBackend,
    /// Prefix for counter keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Sweep interval for expired in-memory windows
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_policy: default_anonymous_policy(),
            backend: CounterBackend::default(),
            key_prefix: default_key_prefix(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

impl RateLimitConfig {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.key_prefix.is_empty() {
            return Err("Rate limit key prefix cannot be empty".to_string());
        }
        if self.key_prefix.contains(char::is_whitespace) {
            return Err("Rate limit key prefix cannot contain whitespace".to_string());
        }
        Ok(())
    }
}

fn default_anonymous_policy() -> Option<RateLimitPolicy> {
    RateLimitPolicy::per_minute(10).ok()
}

fn default_key_prefix() -> String {
    "authgate:ratelimit".to_string()
}

fn default_cleanup_interval() -> u64 {
    60
}
