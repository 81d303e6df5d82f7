//! Credential tables

use super::{MemoryStore, RoleRecord, Tables, UserRecord};
use crate::core::models::{NewUser, Permission, Role, User};
use crate::core::rate_limiter::RateLimitPolicy;
use crate::storage::CredentialStore;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

impl Tables {
    fn user_id_by_username(&self, username: &str) -> Option<Uuid> {
        self.users
            .values()
            .find(|u| u.username == username)
            .map(|u| u.id)
    }

    fn role_id_by_name(&self, name: &str) -> Option<Uuid> {
        self.roles.values().find(|r| r.name == name).map(|r| r.id)
    }

    fn permission_id_by_name(&self, name: &str) -> Option<Uuid> {
        self.permissions
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }

    fn resolve_role(&self, record: &RoleRecord) -> Role {
        let permissions = self
            .role_permissions
            .iter()
            .filter(|(role_id, _)| *role_id == record.id)
            .filter_map(|(_, permission_id)| self.permissions.get(permission_id).cloned())
            .collect();

        Role {
            id: record.id,
            name: record.name.clone(),
            permissions,
            rate_limit: record.rate_limit,
        }
    }

    fn resolve_user(&self, record: &UserRecord) -> User {
        let roles = self
            .user_roles
            .iter()
            .filter(|(user_id, _)| *user_id == record.id)
            .filter_map(|(_, role_id)| self.roles.get(role_id))
            .map(|role| self.resolve_role(role))
            .collect();

        User {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            password_hash: record.password_hash.clone(),
            is_active: record.is_active,
            roles,
            access_token: record.access_token.clone(),
            refresh_token: record.refresh_token.clone(),
            last_login_at: record.last_login_at,
            created_at: record.created_at,
        }
    }

    fn resolve_user_by_id(&self, id: Uuid) -> Result<User> {
        self.users
            .get(&id)
            .map(|record| self.resolve_user(record))
            .ok_or_else(|| GatewayError::not_found(format!("User {} not found", id)))
    }

    fn require_user(&self, username: &str) -> Result<Uuid> {
        self.user_id_by_username(username)
            .ok_or_else(|| GatewayError::not_found(format!("User {} not found", username)))
    }

    fn require_role(&self, name: &str) -> Result<Uuid> {
        self.role_id_by_name(name)
            .ok_or_else(|| GatewayError::not_found(format!("Role {} not found", name)))
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .map(|record| tables.resolve_user(record)))
    }

    async fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables
            .users
            .values()
            .find(|u| u.refresh_token.as_deref() == Some(token))
            .map(|record| tables.resolve_user(record)))
    }

    async fn record_login(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<()> {
        let mut tables = self.tables.write();
        let record = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| GatewayError::not_found(format!("User {} not found", user_id)))?;

        record.access_token = Some(access_token.to_string());
        record.refresh_token = Some(refresh_token.to_string());
        record.last_login_at = Some(chrono::Utc::now());
        Ok(())
    }

    async fn swap_tokens(
        &self,
        user_id: Uuid,
        expected_refresh: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<bool> {
        let mut tables = self.tables.write();
        let Some(record) = tables.users.get_mut(&user_id) else {
            return Ok(false);
        };

        // Already holding the new token means a retried swap that committed
        if record.refresh_token.as_deref() == Some(refresh_token) {
            return Ok(true);
        }
        if record.refresh_token.as_deref() != Some(expected_refresh) {
            debug!("Refresh token for {} already superseded", record.username);
            return Ok(false);
        }

        record.access_token = Some(access_token.to_string());
        record.refresh_token = Some(refresh_token.to_string());
        Ok(true)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(GatewayError::conflict(format!(
                "Username {} already exists",
                user.username
            )));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(GatewayError::conflict(format!(
                "Email {} already exists",
                user.email
            )));
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            is_active: user.is_active,
            access_token: None,
            refresh_token: None,
            last_login_at: None,
            created_at: chrono::Utc::now(),
        };
        let id = record.id;
        tables.users.insert(id, record);
        tables.resolve_user_by_id(id)
    }

    async fn set_user_active(&self, username: &str, is_active: bool) -> Result<User> {
        let mut tables = self.tables.write();
        let id = tables.require_user(username)?;
        if let Some(record) = tables.users.get_mut(&id) {
            record.is_active = is_active;
        }
        tables.resolve_user_by_id(id)
    }

    async fn upsert_role(
        &self,
        name: &str,
        rate_limit: RateLimitPolicy,
        permissions: &[String],
    ) -> Result<Role> {
        let mut tables = self.tables.write();

        let role_id = match tables.role_id_by_name(name) {
            Some(id) => {
                if let Some(role) = tables.roles.get_mut(&id) {
                    role.rate_limit = rate_limit;
                }
                tables.role_permissions.retain(|(rid, _)| *rid != id);
                id
            }
            None => {
                let id = Uuid::new_v4();
                tables.roles.insert(
                    id,
                    RoleRecord {
                        id,
                        name: name.to_string(),
                        rate_limit,
                    },
                );
                id
            }
        };

        for permission in permissions {
            let permission_id = match tables.permission_id_by_name(permission) {
                Some(id) => id,
                None => {
                    let id = Uuid::new_v4();
                    tables.permissions.insert(id, permission.clone());
                    id
                }
            };
            if !tables.role_permissions.contains(&(role_id, permission_id)) {
                tables.role_permissions.push((role_id, permission_id));
            }
        }

        let record = tables.roles[&role_id].clone();
        Ok(tables.resolve_role(&record))
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let tables = self.tables.read();
        Ok(tables
            .roles
            .values()
            .find(|r| r.name == name)
            .map(|record| tables.resolve_role(record)))
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        let tables = self.tables.read();
        let mut roles: Vec<Role> = tables.roles.values().map(|r| tables.resolve_role(r)).collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>> {
        let tables = self.tables.read();
        let mut permissions: Vec<Permission> = tables
            .permissions
            .iter()
            .map(|(id, name)| Permission {
                id: *id,
                name: name.clone(),
            })
            .collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }

    async fn assign_role(&self, username: &str, role_name: &str) -> Result<User> {
        let mut tables = self.tables.write();
        let user_id = tables.require_user(username)?;
        let role_id = tables.require_role(role_name)?;

        if !tables.user_roles.contains(&(user_id, role_id)) {
            tables.user_roles.push((user_id, role_id));
        }
        tables.resolve_user_by_id(user_id)
    }

    async fn revoke_role(&self, username: &str, role_name: &str) -> Result<User> {
        let mut tables = self.tables.write();
        let user_id = tables.require_user(username)?;
        let role_id = tables.require_role(role_name)?;

        tables.user_roles.retain(|pair| *pair != (user_id, role_id));
        tables.resolve_user_by_id(user_id)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
