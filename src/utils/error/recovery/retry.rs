//! Bounded timeout with retry for backing store calls

use super::types::RetryConfig;
use crate::utils::error::{GatewayError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Wraps each attempt in a deadline and retries only when the deadline elapses
///
/// Any other error is returned on the first attempt. A final timeout becomes
/// [`GatewayError::InfrastructureTimeout`]; it is never treated as success.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute `f` under the policy, labelling timeouts with `operation`
    pub async fn call<F, Fut, R>(&self, operation: &str, mut f: F) -> Result<R>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let mut attempt = 0;
        let mut delay = self.config.base_delay;

        loop {
            attempt += 1;

            let outcome = match tokio::time::timeout(self.config.timeout, f()).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::timeout(operation)),
            };

            match outcome {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_attempts => {
                    debug!(
                        "{} timed out on attempt {}, retrying in {:?}",
                        operation, attempt, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.config.max_delay);
                }
                Err(e) => {
                    if e.is_retryable() {
                        warn!("{} timed out after {} attempts", operation, attempt);
                    }
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl From<Duration> for RetryPolicy {
    fn from(timeout: Duration) -> Self {
        Self::new(RetryConfig {
            timeout,
            ..RetryConfig::default()
        })
    }
}
