//! # authgate
//!
//! Authentication, role-based authorization and adaptive per-identity rate
//! limiting for HTTP services, built on actix-web.
//!
//! ## Features
//!
//! - **Token service**: short-lived access tokens and rotating refresh tokens
//!   signed with a shared HMAC secret; only the most recently issued refresh
//!   token of a user can be redeemed
//! - **RBAC**: per-route guards that require any of a set of roles or all of a
//!   set of permissions, resolved from the credential store on every request
//! - **Adaptive rate limiting**: fixed-window counters keyed by user or caller
//!   address, sized by the most permissive policy among the caller's roles
//! - **Audit**: authentication attempts, rate-limit denials and selected
//!   requests are recorded in the audit store
//! - **Pluggable storage**: in-process tables, SQL through sea-orm, shared
//!   counters in Redis
//!
//! ## Running the server
//!
//! ```rust,no_run
//! use authgate::{Config, run_server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/authgate.yaml").await?;
//!     run_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Embedding the pipeline
//!
//! ```rust,no_run
//! use authgate::{AppState, Config, HttpServer};
//! use authgate::storage::StorageLayer;
//! use actix_web::web;
//!
//! # async fn demo() -> authgate::Result<()> {
//! let state = AppState::new(Config::from_env()?, StorageLayer::in_memory())?;
//! let app = HttpServer::create_app(web::Data::new(state));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use auth::{AuthContext, AuthSystem, Claims, JwtHandler, RbacSystem, Requirement, TokenPair};
pub use config::Config;
pub use core::models::{Permission, Role, User};
pub use core::rate_limiter::{RateLimitPolicy, RateLimiter};
pub use server::{AppState, HttpServer, ServerBuilder, run_server};
pub use utils::error::{GatewayError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build time, unix seconds
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

/// Build information of this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
