//! Core functionality
//!
//! Domain records and the rate limiting engine. Nothing here knows about
//! HTTP; the server module adapts these to the request pipeline.

pub mod models;
pub mod rate_limiter;
