//! Application state shared across HTTP handlers

use crate::auth::AuthSystem;
use crate::config::Config;
use crate::core::rate_limiter::RateLimiter;
use crate::server::middleware::RouteMatcher;
use crate::storage::StorageLayer;
use crate::utils::error::{Result, RetryConfig, RetryPolicy};
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned into every worker; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Authentication system
    pub auth: Arc<AuthSystem>,
    /// Per-identity request throttling
    pub rate_limiter: Arc<RateLimiter>,
    /// Storage backends
    pub storage: StorageLayer,
    /// Paths that skip authentication
    pub public_routes: Arc<RouteMatcher>,
    /// Paths never written to the request audit
    pub audit_exempt: Arc<RouteMatcher>,
    /// Deadline and retry bound for store calls made by handlers
    pub retry: RetryPolicy,
}

impl AppState {
    /// Wire the auth system, rate limiter and route classifiers from `config`
    pub fn new(config: Config, storage: StorageLayer) -> Result<Self> {
        let gateway = &config.gateway;
        let retry = RetryPolicy::new(RetryConfig::from_millis(
            gateway.storage.timeout_ms,
            gateway.storage.max_retries,
        ));

        let auth = AuthSystem::new(
            &gateway.auth,
            storage.credentials.clone(),
            storage.audit.clone(),
            retry,
        );
        let rate_limiter = RateLimiter::new(
            gateway.rate_limit.clone(),
            storage.counters.clone(),
            storage.audit.clone(),
            retry,
        );
        let public_routes = RouteMatcher::new(&gateway.routes.public_patterns)?;
        let audit_exempt = RouteMatcher::new(&gateway.audit.exempt_patterns)?;

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            rate_limiter: Arc::new(rate_limiter),
            storage,
            public_routes: Arc::new(public_routes),
            audit_exempt: Arc::new(audit_exempt),
            retry,
        })
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
