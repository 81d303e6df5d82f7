//! Storage interfaces consumed by the auth and rate limit layers
//!
//! Every backend is shared across requests behind an `Arc<dyn ...>`. Callers
//! wrap each call in a [`RetryPolicy`](crate::utils::error::RetryPolicy), so
//! implementations do not need their own deadlines.

use crate::core::models::{
    AuthLogEntry, NewUser, Permission, RateLimitLogEntry, RequestLogEntry, Role, User,
};
use crate::core::rate_limiter::RateLimitPolicy;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

/// Users, roles and permissions plus their associations
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user with roles resolved in assignment order
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Look up the user whose cached refresh token equals `token`
    async fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>>;

    /// Cache a freshly issued token pair and stamp the login time
    async fn record_login(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<()>;

    /// Replace the cached pair only if the cached refresh token still equals `expected_refresh`
    ///
    /// Returns `false` when another rotation won the race. Must be atomic with
    /// respect to concurrent calls on any instance sharing the store. Repeating
    /// a swap that already committed returns `true`.
    async fn swap_tokens(
        &self,
        user_id: Uuid,
        expected_refresh: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<bool>;

    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn set_user_active(&self, username: &str, is_active: bool) -> Result<User>;

    /// Create a role, or update the policy and permissions of an existing one
    ///
    /// Permissions named but not yet present are created.
    async fn upsert_role(
        &self,
        name: &str,
        rate_limit: RateLimitPolicy,
        permissions: &[String],
    ) -> Result<Role>;

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>>;

    async fn list_roles(&self) -> Result<Vec<Role>>;

    async fn list_permissions(&self) -> Result<Vec<Permission>>;

    /// Append `role_name` to the user's roles; assigning twice is a no-op
    async fn assign_role(&self, username: &str, role_name: &str) -> Result<User>;

    async fn revoke_role(&self, username: &str, role_name: &str) -> Result<User>;

    async fn health_check(&self) -> Result<()>;
}

/// Count within the current fixed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Requests counted in this window, including the current one
    pub count: u64,
    /// Time until the window resets
    pub reset_after: Duration,
}

/// Fixed-window counters shared by all instances
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically add one to `key`, opening a new window of `window` if none is live
    async fn increment(&self, key: &str, window: Duration) -> Result<WindowCount>;

    /// Drop windows that have elapsed; a no-op for self-expiring stores
    async fn purge_expired(&self) -> Result<usize> {
        Ok(0)
    }

    async fn health_check(&self) -> Result<()>;
}

/// Sink for audit records; failures are logged by callers, never surfaced
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record_request(&self, entry: RequestLogEntry) -> Result<()>;

    async fn record_auth(&self, entry: AuthLogEntry) -> Result<()>;

    async fn record_rate_limit(&self, entry: RateLimitLogEntry) -> Result<()>;
}
