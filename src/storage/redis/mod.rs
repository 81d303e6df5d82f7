//! Redis storage implementation
//!
//! Shared fixed-window counters for deployments running several instances.
//!
//! ## Module Structure
//!
//! - `pool` - Connection management and health checks
//! - `counters` - Atomic fixed-window counter script

mod counters;
mod pool;

pub use pool::RedisPool;
