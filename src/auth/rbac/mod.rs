//! Role-Based Access Control (RBAC) system
//!
//! Role guards pass when the user holds any listed role. Permission guards
//! pass only when the user holds every listed permission.

mod system;
mod types;

// Re-export public types and structs
pub use system::RbacSystem;
pub use types::{GuardMode, PermissionCheck, Requirement};
