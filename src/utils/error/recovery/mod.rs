//! Error recovery utilities

mod retry;
mod types;

pub use retry::RetryPolicy;
pub use types::RetryConfig;
