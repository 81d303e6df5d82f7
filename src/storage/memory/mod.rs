//! In-process storage backend
//!
//! Flat tables keyed by id with ordered id-pair association lists, guarded by
//! a single lock so compound updates such as token rotation are atomic.
//! Counters live in a sharded map where each key is updated under its shard
//! lock. Suitable for tests and single-instance deployments.

mod audit;
mod counters;
mod credentials;


use crate::core::models::{AuthLogEntry, RateLimitLogEntry, RequestLogEntry};
use crate::core::rate_limiter::RateLimitPolicy;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

const DEFAULT_AUDIT_CAPACITY: usize = 10_000;

/// Memory-backed credential, counter and audit store
pub struct MemoryStore {
    tables: RwLock<Tables>,
    counters: DashMap<String, WindowEntry>,
    audit: Mutex<AuditTables>,
    audit_capacity: usize,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    roles: HashMap<Uuid, RoleRecord>,
    permissions: HashMap<Uuid, String>,
    /// (user id, role id) in assignment order
    user_roles: Vec<(Uuid, Uuid)>,
    /// (role id, permission id) in association order
    role_permissions: Vec<(Uuid, Uuid)>,
}

#[derive(Clone)]
struct UserRecord {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    is_active: bool,
    access_token: Option<String>,
    refresh_token: Option<String>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
struct RoleRecord {
    id: Uuid,
    name: String,
    rate_limit: RateLimitPolicy,
}

struct WindowEntry {
    count: u64,
    started: Instant,
    window: Duration,
}

impl WindowEntry {
    fn is_elapsed(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.window
    }
}

#[derive(Default)]
struct AuditTables {
    requests: VecDeque<RequestLogEntry>,
    auth: VecDeque<AuthLogEntry>,
    rate_limits: VecDeque<RateLimitLogEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_audit_capacity(DEFAULT_AUDIT_CAPACITY)
    }

    /// Keep at most `capacity` entries per audit table, dropping the oldest
    pub fn with_audit_capacity(capacity: usize) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            counters: DashMap::new(),
            audit: Mutex::new(AuditTables::default()),
            audit_capacity: capacity.max(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("MemoryStore")
            .field("users", &tables.users.len())
            .field("roles", &tables.roles.len())
            .field("permissions", &tables.permissions.len())
            .field("counters", &self.counters.len())
            .finish()
    }
}
