//! JWT token handling
//!
//! Signing and validation of HS256 bearer tokens. Whether a token still
//! belongs to an active user is decided by [`AuthSystem`](crate::auth::AuthSystem).

mod handler;
pub mod types;
mod utils;


pub use types::{Claims, JwtHandler, TokenPair, TokenType};
pub use utils::extract_bearer;
