//! Fixed-window rate limit enforcement

use super::identity::RateLimitIdentity;
use super::policy::{RateLimitPolicy, most_permissive};
use super::types::RateLimitResult;
use crate::config::models::rate_limit::RateLimitConfig;
use crate::core::models::{RateLimitLogEntry, User};
use crate::storage::{AuditStore, CounterStore};
use crate::utils::error::{GatewayError, Result, RetryPolicy};
use std::sync::Arc;
use tracing::{debug, warn};

/// Selects a policy per caller and enforces it against a shared counter store
#[derive(Clone)]
pub struct RateLimiter {
    pub(super) config: RateLimitConfig,
    pub(super) counters: Arc<dyn CounterStore>,
    pub(super) audit: Arc<dyn AuditStore>,
    pub(super) retry: RetryPolicy,
}

impl RateLimiter {
    pub fn new(
        config: RateLimitConfig,
        counters: Arc<dyn CounterStore>,
        audit: Arc<dyn AuditStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            config,
            counters,
            audit,
            retry,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Policy for a caller; `None` means unlimited
    ///
    /// Users get the most permissive policy among their roles, ties going to
    /// the earliest assigned role. Anonymous callers and users without roles
    /// get the configured default.
    pub fn select_policy(&self, user: Option<&User>) -> Option<RateLimitPolicy> {
        user.and_then(|u| most_permissive(&u.roles))
            .or(self.config.default_policy)
    }

    /// Count this request against `(identity, route)` and admit or deny it
    ///
    /// A denial is written to the audit store before `TooManyRequests` is
    /// returned. A counter store that does not answer in time yields
    /// `InfrastructureTimeout`, never an admission.
    pub async fn check_and_consume(
        &self,
        identity: &RateLimitIdentity,
        route: &str,
        policy: &RateLimitPolicy,
    ) -> Result<RateLimitResult> {
        let key = self.counter_key(identity, route);
        let window = policy.interval();

        let count = self
            .retry
            .call("rate limit counter", || self.counters.increment(&key, window))
            .await?;

        let result = RateLimitResult::from_window(count, policy);
        if result.allowed {
            debug!(
                "Rate limit ok for {} on {}: {}/{}",
                identity.key, route, result.current_count, result.limit
            );
            return Ok(result);
        }

        warn!(
            "Rate limit exceeded for {} on {} ({})",
            identity.key, route, policy
        );
        self.record_denial(identity, route, policy).await;
        Err(GatewayError::too_many_requests(result.retry_after_secs()))
    }

    /// Select a policy for `user` and enforce it; unlimited callers are not counted
    pub async fn enforce(
        &self,
        identity: &RateLimitIdentity,
        user: Option<&User>,
        route: &str,
    ) -> Result<Option<RateLimitResult>> {
        if !self.config.enabled {
            return Ok(None);
        }

        match self.select_policy(user) {
            Some(policy) => self.check_and_consume(identity, route, &policy).await.map(Some),
            None => Ok(None),
        }
    }

    /// Start the periodic sweep of elapsed windows
    pub fn start_cleanup_task(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        let period = self.config.cleanup_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match limiter.counters.purge_expired().await {
                    Ok(0) => {}
                    Ok(purged) => debug!("Purged {} expired rate limit windows", purged),
                    Err(e) => warn!("Rate limit window sweep failed: {}", e),
                }
            }
        })
    }

    fn counter_key(&self, identity: &RateLimitIdentity, route: &str) -> String {
        format!("{}:{}:{}", self.config.key_prefix, identity.key, route)
    }

    async fn record_denial(
        &self,
        identity: &RateLimitIdentity,
        route: &str,
        policy: &RateLimitPolicy,
    ) {
        let entry = RateLimitLogEntry {
            user_id: identity.user_id,
            identity: identity.key.clone(),
            route: route.to_string(),
            policy: *policy,
            at: chrono::Utc::now(),
        };

        if let Err(e) = self.audit.record_rate_limit(entry).await {
            warn!("Failed to record rate limit denial: {}", e);
        }
    }
}
