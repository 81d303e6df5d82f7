//! Authentication and authorization system
//!
//! Token issuance and rotation, bearer authentication, password hashing and
//! role/permission resolution.

pub mod jwt;
pub mod password;
pub mod rbac;
mod system;


pub use jwt::{Claims, JwtHandler, TokenPair, TokenType};
pub use rbac::{GuardMode, RbacSystem, Requirement};
pub use system::{AuthContext, AuthSystem};
