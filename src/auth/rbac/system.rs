//! RBAC system core functionality

use crate::core::models::User;
use crate::utils::error::{GatewayError, Result};
use std::collections::BTreeSet;
use tracing::debug;

use super::types::{PermissionCheck, Requirement};

/// Stateless resolver over a user's already-resolved roles
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacSystem;

impl RbacSystem {
    pub fn new() -> Self {
        Self
    }

    /// True iff the user's role names intersect `required`
    pub fn has_any_role(&self, user: &User, required: &BTreeSet<String>) -> bool {
        user.roles.iter().any(|role| required.contains(&role.name))
    }

    /// True iff `required` is a subset of the user's permission union
    pub fn has_all_permissions(&self, user: &User, required: &BTreeSet<String>) -> bool {
        let held = user.permissions();
        required.is_subset(&held)
    }

    /// Evaluate `requirement` and explain the outcome
    pub fn check(&self, user: &User, requirement: &Requirement) -> PermissionCheck {
        match requirement {
            Requirement::AnyRole(required) => {
                let granted_by_roles: Vec<String> = user
                    .roles
                    .iter()
                    .filter(|role| required.contains(&role.name))
                    .map(|role| role.name.clone())
                    .collect();
                let granted = self.has_any_role(user, required);
                PermissionCheck {
                    granted,
                    granted_by_roles,
                    denial_reason: (!granted).then(|| format!("requires {}", requirement)),
                }
            }
            Requirement::AllPermissions(required) => {
                let held = user.permissions();
                let missing: Vec<&str> = required
                    .difference(&held)
                    .map(String::as_str)
                    .collect();
                let granted = self.has_all_permissions(user, required);
                let granted_by_roles = if granted {
                    user.roles
                        .iter()
                        .filter(|role| role.permissions.iter().any(|p| required.contains(p)))
                        .map(|role| role.name.clone())
                        .collect()
                } else {
                    Vec::new()
                };
                PermissionCheck {
                    granted,
                    granted_by_roles,
                    denial_reason: (!granted)
                        .then(|| format!("missing permissions [{}]", missing.join(", "))),
                }
            }
        }
    }

    /// Fail with `InsufficientPrivileges` unless `requirement` holds
    pub fn authorize(&self, user: &User, requirement: &Requirement) -> Result<()> {
        let check = self.check(user, requirement);
        if check.granted {
            return Ok(());
        }

        debug!(
            "Denied {}: {}",
            user.username,
            check.denial_reason.as_deref().unwrap_or("insufficient privileges")
        );
        Err(GatewayError::InsufficientPrivileges)
    }
}
