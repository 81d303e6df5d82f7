//! Audit records written by the request pipeline

use crate::core::rate_limiter::RateLimitPolicy;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One logged request
#[derive(Debug, Clone, Serialize)]
pub struct RequestLogEntry {
    pub user_id: Option<Uuid>,
    /// Username, or `anonymous:<ip>` for unauthenticated callers
    pub identity: String,
    pub client_ip: String,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub status: u16,
    pub duration_ms: u64,
    pub at: DateTime<Utc>,
}

/// One login or refresh attempt
#[derive(Debug, Clone, Serialize)]
pub struct AuthLogEntry {
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub success: bool,
    pub message: String,
    pub client_ip: String,
    pub endpoint: String,
    pub method: String,
    pub at: DateTime<Utc>,
}

/// One rate limit denial
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitLogEntry {
    pub user_id: Option<Uuid>,
    pub identity: String,
    pub route: String,
    pub policy: RateLimitPolicy,
    pub at: DateTime<Utc>,
}
