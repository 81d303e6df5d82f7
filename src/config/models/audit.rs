//! Request audit configuration

use serde::{Deserialize, Serialize};

/// Which requests get a request-log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "super::default_true")]
    pub enabled: bool,
    /// HTTP methods that are always logged
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    /// Responses with this status or higher are always logged
    #[serde(default = "default_min_status")]
    pub min_status: u16,
    /// Glob patterns for routes that are never logged
    #[serde(default = "default_exempt_patterns")]
    pub exempt_patterns: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            methods: default_methods(),
            min_status: default_min_status(),
            exempt_patterns: default_exempt_patterns(),
        }
    }
}

impl AuditConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(100..=599).contains(&self.min_status) {
            return Err(format!("Invalid audit status threshold: {}", self.min_status));
        }
        for method in &self.methods {
            if actix_web::http::Method::from_bytes(method.as_bytes()).is_err() {
                return Err(format!("Invalid audit method: {}", method));
            }
        }
        Ok(())
    }
}

fn default_methods() -> Vec<String> {
    ["POST", "PUT", "PATCH", "DELETE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_min_status() -> u16 {
    400
}

fn default_exempt_patterns() -> Vec<String> {
    ["/health", "/health/*", "/favicon.ico", "/docs", "/docs/*"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
