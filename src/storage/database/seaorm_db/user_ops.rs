use crate::core::models::{NewUser, Permission, Role, User};
use crate::core::rate_limiter::RateLimitPolicy;
use crate::storage::CredentialStore;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, user, user_role};
use super::role_ops::{load_roles, require_role_id};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    async fn hydrate_user<C: ConnectionTrait>(db: &C, model: user::Model) -> Result<User> {
        let role_ids: Vec<Uuid> = entities::UserRole::find()
            .filter(user_role::Column::UserId.eq(model.id))
            .order_by_asc(user_role::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.role_id)
            .collect();

        let roles = load_roles(db, &role_ids).await?;
        Ok(model.to_domain_user(roles))
    }

    async fn find_user_model(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(entities::User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    async fn require_user_model(&self, username: &str) -> Result<user::Model> {
        self.find_user_model(username)
            .await?
            .ok_or_else(|| GatewayError::not_found(format!("User {} not found", username)))
    }
}

#[async_trait]
impl CredentialStore for SeaOrmDatabase {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        debug!("Finding user by username: {}", username);

        match self.find_user_model(username).await? {
            Some(model) => Ok(Some(Self::hydrate_user(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>> {
        let model = entities::User::find()
            .filter(user::Column::RefreshToken.eq(token))
            .one(&self.db)
            .await?;

        match model {
            Some(model) => Ok(Some(Self::hydrate_user(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn record_login(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<()> {
        debug!("Recording login for user: {}", user_id);

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let result = entities::User::update_many()
            .col_expr(user::Column::AccessToken, Expr::value(access_token.to_string()))
            .col_expr(user::Column::RefreshToken, Expr::value(refresh_token.to_string()))
            .col_expr(user::Column::LastLoginAt, Expr::value(now))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(GatewayError::not_found(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn swap_tokens(
        &self,
        user_id: Uuid,
        expected_refresh: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<bool> {
        // Conditional update: only the caller holding the current token matches.
        // A row already carrying the new token is a retried swap that committed.
        let result = entities::User::update_many()
            .col_expr(user::Column::AccessToken, Expr::value(access_token.to_string()))
            .col_expr(user::Column::RefreshToken, Expr::value(refresh_token.to_string()))
            .col_expr(
                user::Column::UpdatedAt,
                Expr::value(DateTimeWithTimeZone::from(chrono::Utc::now())),
            )
            .filter(user::Column::Id.eq(user_id))
            .filter(user::Column::RefreshToken.is_in([expected_refresh, refresh_token]))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        debug!("Creating user: {}", new_user.username);

        let taken = entities::User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(new_user.username.as_str()))
                    .add(user::Column::Email.eq(new_user.email.as_str())),
            )
            .one(&self.db)
            .await?;

        if let Some(existing) = taken {
            let message = if existing.username == new_user.username {
                format!("Username {} already exists", new_user.username)
            } else {
                format!("Email {} already exists", new_user.email)
            };
            return Err(GatewayError::conflict(message));
        }

        let model = user::Model::from_new_user(&new_user).insert(&self.db).await?;
        Ok(model.to_domain_user(Vec::new()))
    }

    async fn set_user_active(&self, username: &str, is_active: bool) -> Result<User> {
        let model = self.require_user_model(username).await?;

        let mut active: user::ActiveModel = model.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&self.db).await?;

        Self::hydrate_user(&self.db, updated).await
    }

    async fn upsert_role(
        &self,
        name: &str,
        rate_limit: RateLimitPolicy,
        permissions: &[String],
    ) -> Result<Role> {
        self.upsert_role_row(name, rate_limit, permissions).await
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        self.find_role_row(name).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.list_role_rows().await
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>> {
        self.list_permission_rows().await
    }

    async fn assign_role(&self, username: &str, role_name: &str) -> Result<User> {
        let model = self.require_user_model(username).await?;
        let role_id = require_role_id(&self.db, role_name).await?;

        let already = entities::UserRole::find()
            .filter(user_role::Column::UserId.eq(model.id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .one(&self.db)
            .await?;

        if already.is_none() {
            entities::UserRole::insert(user_role::ActiveModel {
                id: NotSet,
                user_id: Set(model.id),
                role_id: Set(role_id),
            })
            .exec(&self.db)
            .await?;
        }

        Self::hydrate_user(&self.db, model).await
    }

    async fn revoke_role(&self, username: &str, role_name: &str) -> Result<User> {
        let model = self.require_user_model(username).await?;
        let role_id = require_role_id(&self.db, role_name).await?;

        entities::UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(model.id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await?;

        Self::hydrate_user(&self.db, model).await
    }

    async fn health_check(&self) -> Result<()> {
        self.ping().await
    }
}
