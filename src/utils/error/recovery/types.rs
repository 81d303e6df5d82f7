//! Types and configurations for error recovery patterns

use std::time::Duration;

/// Bounded timeout and retry settings for calls into a backing store
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Deadline for a single attempt
    pub timeout: Duration,
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Pause between attempts, doubled each time
    pub base_delay: Duration,
    /// Upper bound on the pause
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2000),
            max_attempts: 2,
            base_delay: Duration::from_millis(25),
            max_delay: Duration::from_millis(250),
        }
    }
}

impl RetryConfig {
    /// Build from millisecond timeout and a retry count (attempts = retries + 1)
    pub fn from_millis(timeout_ms: u64, max_retries: u32) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            max_attempts: max_retries.saturating_add(1),
            ..Self::default()
        }
    }
}
