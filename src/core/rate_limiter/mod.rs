//! Rate limiting
//!
//! Policy model, per-caller policy selection and fixed-window enforcement
//! against a [`CounterStore`](crate::storage::CounterStore).

mod identity;
mod limiter;
mod policy;
mod types;


pub use identity::{RateLimitIdentity, client_ip, identity_key};
pub use limiter::RateLimiter;
pub use policy::{RateLimitPolicy, most_permissive};
pub use types::RateLimitResult;
