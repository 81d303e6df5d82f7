//! Startup seeding configuration

use serde::{Deserialize, Serialize};

/// Administrative bootstrap performed once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Create the built-in roles and permissions when missing
    #[serde(default = "super::default_true")]
    pub seed_default_roles: bool,
    /// First super administrator, created when absent
    #[serde(default)]
    pub super_admin: Option<SuperAdminConfig>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            seed_default_roles: true,
            super_admin: None,
        }
    }
}

/// Credentials for the first super administrator
#[derive(Clone, Serialize, Deserialize)]
pub struct SuperAdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SuperAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperAdminConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl BootstrapConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(admin) = &self.super_admin {
            if admin.username.trim().is_empty() {
                return Err("Super admin username cannot be empty".to_string());
            }
            if !admin.email.contains('@') {
                return Err(format!("Invalid super admin email: {}", admin.email));
            }
            if admin.password.len() < 8 {
                return Err("Super admin password must be at least 8 characters".to_string());
            }
        }
        Ok(())
    }
}
