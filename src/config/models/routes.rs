//! Route classification configuration

use serde::{Deserialize, Serialize};

/// Glob patterns for routes that do not require a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// `*` matches any run of characters including `/`, `?` matches one character
    #[serde(default = "default_public_patterns")]
    pub public_patterns: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            public_patterns: default_public_patterns(),
        }
    }
}

fn default_public_patterns() -> Vec<String> {
    [
        "/favicon.ico",
        "/openapi.json",
        "/docs",
        "/docs/*",
        "/health",
        "/health/*",
        "/public/*",
        "/auth/token",
        "/auth/refresh",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
