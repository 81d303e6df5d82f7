//! Core data models
//!
//! Users, roles and permissions as the pipeline sees them, plus the audit
//! records it emits. Storage backends keep these in flat tables joined by id;
//! a [`User`] handed out by a store already carries its resolved roles.

pub mod audit;
pub mod role;
pub mod user;

pub use audit::{AuthLogEntry, RateLimitLogEntry, RequestLogEntry};
pub use role::{Permission, Role};
pub use user::{NewUser, User};
