//! RBAC type definitions

use std::collections::BTreeSet;
use std::fmt;

/// Which check a guard performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMode {
    /// Any of the listed roles
    Role,
    /// All of the listed permissions
    Permission,
}

/// Access requirement declared by a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Pass when the user holds at least one of these roles
    AnyRole(BTreeSet<String>),
    /// Pass when the user holds every one of these permissions
    AllPermissions(BTreeSet<String>),
}

impl Requirement {
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyRole(roles.into_iter().map(Into::into).collect())
    }

    pub fn all_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllPermissions(permissions.into_iter().map(Into::into).collect())
    }

    pub fn mode(&self) -> GuardMode {
        match self {
            Self::AnyRole(_) => GuardMode::Role,
            Self::AllPermissions(_) => GuardMode::Permission,
        }
    }

    /// The role or permission names this requirement lists
    pub fn names(&self) -> &BTreeSet<String> {
        match self {
            Self::AnyRole(names) | Self::AllPermissions(names) => names,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().iter().map(String::as_str).collect();
        match self {
            Self::AnyRole(_) => write!(f, "any role of [{}]", names.join(", ")),
            Self::AllPermissions(_) => write!(f, "all permissions of [{}]", names.join(", ")),
        }
    }
}

/// Permission check result
#[derive(Debug, Clone)]
pub struct PermissionCheck {
    /// Whether permission is granted
    pub granted: bool,
    /// Roles that granted the requirement
    pub granted_by_roles: Vec<String>,
    /// Reason for denial (if not granted)
    pub denial_reason: Option<String>,
}
