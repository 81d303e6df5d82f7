//! Role and permission models

use crate::core::rate_limiter::RateLimitPolicy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named bundle of permissions with one rate limit policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    /// Permission names in association order
    pub permissions: Vec<String>,
    pub rate_limit: RateLimitPolicy,
}

/// A named capability atom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
}
