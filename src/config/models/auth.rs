//! Authentication configuration

use super::gateway::Environment;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Secrets that ship in sample files and must never sign real tokens
const KNOWN_DEFAULT_SECRETS: &[&str] = &[
    "your-secret-key",
    "change-me",
    "changeme",
    "secret",
    "CHANGE_ME_IN_PRODUCTION_0123456789abcdef",
];

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret shared by every instance
    #[serde(default = "generate_secure_jwt_secret")]
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: u64,
    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl_secs: u64,
    /// Optional `iss` claim stamped on and required from tokens
    #[serde(default)]
    pub issuer: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generate_secure_jwt_secret(),
            access_token_ttl_secs: default_access_token_ttl(),
            refresh_token_ttl_secs: default_refresh_token_ttl(),
            issuer: None,
        }
    }
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long for security".to_string());
        }

        if self.access_token_ttl_secs == 0 {
            return Err("Access token TTL must be greater than 0".to_string());
        }

        if self.refresh_token_ttl_secs < self.access_token_ttl_secs {
            return Err(
                "Refresh token TTL must not be shorter than the access token TTL".to_string(),
            );
        }

        Ok(())
    }

    /// Whether the secret is one of the well-known sample values
    pub fn uses_default_secret(&self) -> bool {
        KNOWN_DEFAULT_SECRETS.contains(&self.jwt_secret.as_str())
    }

    pub fn access_token_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.access_token_ttl_secs)
    }

    pub fn refresh_token_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_token_ttl_secs)
    }
}

fn default_access_token_ttl() -> u64 {
    30 * 60
}

fn default_refresh_token_ttl() -> u64 {
    60 * 60
}

/// Generate a secure random JWT secret
pub fn generate_secure_jwt_secret() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Reject or warn about a sample signing secret depending on the environment
pub fn check_insecure_config(config: &AuthConfig, environment: Environment) -> Result<(), String> {
    if !config.uses_default_secret() {
        return Ok(());
    }

    if environment.is_production() {
        return Err("JWT secret is a published default value; set AUTHGATE_JWT_SECRET".to_string());
    }

    warn!(
        "JWT secret is a published default value. Tokens signed in {:?} are forgeable.",
        environment
    );
    Ok(())
}
