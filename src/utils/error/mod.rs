//! Error handling utilities
//!
//! The error taxonomy, its HTTP mapping and the bounded retry used around
//! backing store calls.

pub mod error;
pub mod recovery;

pub use error::*;
pub use recovery::*;
