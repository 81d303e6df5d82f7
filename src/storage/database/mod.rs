//! Database storage implementation using SeaORM
//!
//! Users, roles, permissions and the three audit tables. Works against
//! SQLite or PostgreSQL depending on the enabled feature and URL scheme.

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// SeaORM database implementation module
pub mod seaorm_db;

// Re-export the main database interface
pub use seaorm_db::SeaOrmDatabase as Database;
pub use seaorm_db::DatabaseBackendType;
