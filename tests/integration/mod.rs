//! Integration tests for authgate
//!
//! These tests drive the complete request pipeline over real stores.

pub mod auth_flow_tests;
pub mod authorization_tests;
pub mod config_tests;
pub mod database_tests;
pub mod rate_limit_tests;
