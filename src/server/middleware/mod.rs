//! HTTP middleware implementations
//!
//! The request pipeline, outermost first:
//! - Request audit
//! - Rate limiting
//! - Authentication
//! - Per-route RBAC guards

mod audit;
mod auth;
mod helpers;
mod rate_limit;
mod rbac;

#[cfg(test)]
mod tests;

// Re-export all middleware
pub use audit::{AuditMiddleware, AuditMiddlewareService};
pub use auth::{AuthMiddleware, AuthMiddlewareService};
pub use helpers::{AuthenticatedUser, RouteMatcher, bearer_token};
pub use rate_limit::{RateLimitMiddleware, RateLimitMiddlewareService};
pub use rbac::{RbacGuard, RbacGuardService};
