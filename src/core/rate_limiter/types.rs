//! Rate limiter types

use super::policy::RateLimitPolicy;
use crate::storage::WindowCount;

/// Outcome of one admitted check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Current request count in the window
    pub current_count: u64,
    /// Maximum requests allowed
    pub limit: u64,
    /// Remaining requests in the window
    pub remaining: u64,
    /// Time until the window resets (in seconds, rounded up)
    pub reset_after_secs: u64,
}

impl RateLimitResult {
    pub(super) fn from_window(window: WindowCount, policy: &RateLimitPolicy) -> Self {
        let limit = u64::from(policy.times());
        let reset_after_secs = window.reset_after.as_millis().div_ceil(1000) as u64;
        Self {
            allowed: window.count <= limit,
            current_count: window.count,
            limit,
            remaining: limit.saturating_sub(window.count),
            reset_after_secs,
        }
    }

    /// Value for a `Retry-After` header; never zero
    pub fn retry_after_secs(&self) -> u64 {
        self.reset_after_secs.max(1)
    }
}
