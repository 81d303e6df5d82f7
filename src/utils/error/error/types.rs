//! Error types for the gateway

use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
///
/// The first group of variants is the security taxonomy surfaced to clients.
/// Every one of them is terminal for the current request.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No bearer token on a protected route
    #[error("Missing token")]
    MissingToken,

    /// Token could not be decoded or its signature did not verify
    #[error("This token is malformed")]
    MalformedToken,

    /// Token `exp` is in the past
    #[error("This token has expired")]
    ExpiredToken,

    /// A claim the token must carry is absent
    #[error("Token is missing required claim: {0}")]
    MissingRequiredClaim(String),

    /// Password mismatch, stale refresh token or subject mismatch
    #[error("Could not validate credentials")]
    CredentialsInvalid,

    /// No user with this username
    #[error("Username {0} does not exist")]
    InexistentUsername(String),

    /// User exists but is deactivated
    #[error("User {0} is inactive")]
    InactiveUser(String),

    /// Role or permission check failed
    #[error("You don't have enough permissions")]
    InsufficientPrivileges,

    /// Rate limit window exhausted
    #[error("Too many requests. Please try again later.")]
    TooManyRequests {
        /// Seconds until the current window resets
        retry_after_secs: u64,
    },

    /// A credential or counter store call did not answer in time
    #[error("Infrastructure timeout: {0}")]
    InfrastructureTimeout(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Redis errors
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Token signing errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Password hashing errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
