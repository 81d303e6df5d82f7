//! Startup seeding of built-in roles and the first super administrator

use crate::auth::password::hash_password;
use crate::config::{BootstrapConfig, SuperAdminConfig};
use crate::core::models::{NewUser, User};
use crate::core::rate_limiter::RateLimitPolicy;
use crate::storage::CredentialStore;
use crate::utils::error::Result;
use tracing::{debug, info};

/// Name of the role granted to the bootstrap administrator
pub const SUPER_ADMIN_ROLE: &str = "SuperAdmin";

/// Built-in role: (name, requests per minute, permissions)
pub const DEFAULT_ROLES: &[(&str, u32, &[&str])] = &[
    (
        SUPER_ADMIN_ROLE,
        50,
        &[
            "manage_system",
            "manage_users",
            "manage_roles",
            "moderate_content",
            "create_content",
            "edit_content",
            "delete_content",
            "view_content",
            "submit_content",
            "access_public_content",
        ],
    ),
    (
        "Admin",
        40,
        &[
            "manage_users",
            "manage_roles",
            "create_content",
            "edit_content",
            "delete_content",
            "view_content",
            "submit_content",
            "access_public_content",
        ],
    ),
    (
        "Moderator",
        25,
        &["moderate_content", "view_content", "access_public_content"],
    ),
    (
        "Editor",
        25,
        &[
            "create_content",
            "edit_content",
            "delete_content",
            "view_content",
            "submit_content",
            "access_public_content",
        ],
    ),
    ("Viewer", 10, &["view_content", "access_public_content"]),
    (
        "Contributor",
        10,
        &["submit_content", "view_content", "access_public_content"],
    ),
    ("Guest", 10, &["access_public_content"]),
];

/// Create every built-in role that does not exist yet
///
/// Existing roles keep their stored policy and permissions. Returns the
/// number of roles created.
pub async fn seed_default_roles(store: &dyn CredentialStore) -> Result<usize> {
    let mut created = 0;
    for (name, per_minute, permissions) in DEFAULT_ROLES {
        if store.find_role_by_name(name).await?.is_some() {
            debug!("Role {} already present", name);
            continue;
        }

        let permissions: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
        store
            .upsert_role(name, RateLimitPolicy::per_minute(*per_minute)?, &permissions)
            .await?;
        created += 1;
    }

    if created > 0 {
        info!("Seeded {} default roles", created);
    }
    Ok(created)
}

/// Create the configured super administrator when absent
///
/// Returns the user only when it was created by this call.
pub async fn ensure_super_admin(
    store: &dyn CredentialStore,
    admin: &SuperAdminConfig,
) -> Result<Option<User>> {
    if store.find_user_by_username(&admin.username).await?.is_some() {
        debug!("Super admin {} already exists", admin.username);
        return Ok(None);
    }

    let password_hash = hash_password(&admin.password)?;
    let user = store
        .create_user(NewUser::new(&admin.username, &admin.email, password_hash))
        .await?;
    let user = store.assign_role(&user.username, SUPER_ADMIN_ROLE).await?;

    info!("Created super admin {}", user.username);
    Ok(Some(user))
}

/// Apply the configured bootstrap steps in order
pub async fn run(store: &dyn CredentialStore, config: &BootstrapConfig) -> Result<()> {
    if config.seed_default_roles {
        seed_default_roles(store).await?;
    }
    if let Some(admin) = &config.super_admin {
        ensure_super_admin(store, admin).await?;
    }
    Ok(())
}
