use crate::core::models::{Permission, Role};
use crate::core::rate_limiter::RateLimitPolicy;
use crate::utils::error::{GatewayError, Result};
use sea_orm::*;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, permission, role, role_permission};
use super::types::SeaOrmDatabase;

/// Resolve roles with their permissions, keeping the order of `role_ids`
pub(super) async fn load_roles<C: ConnectionTrait>(db: &C, role_ids: &[Uuid]) -> Result<Vec<Role>> {
    if role_ids.is_empty() {
        return Ok(Vec::new());
    }

    let role_models: HashMap<Uuid, role::Model> = entities::Role::find()
        .filter(role::Column::Id.is_in(role_ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|model| (model.id, model))
        .collect();

    let links = entities::RolePermission::find()
        .filter(role_permission::Column::RoleId.is_in(role_ids.iter().copied()))
        .order_by_asc(role_permission::Column::Id)
        .all(db)
        .await?;

    let permission_names: HashMap<Uuid, String> = entities::Permission::find()
        .filter(permission::Column::Id.is_in(links.iter().map(|l| l.permission_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|model| (model.id, model.name))
        .collect();

    let mut roles = Vec::with_capacity(role_ids.len());
    for id in role_ids {
        let Some(model) = role_models.get(id) else {
            continue;
        };
        let permissions = links
            .iter()
            .filter(|link| link.role_id == *id)
            .filter_map(|link| permission_names.get(&link.permission_id).cloned())
            .collect();

        roles.push(Role {
            id: model.id,
            name: model.name.clone(),
            permissions,
            rate_limit: model.rate_limit()?,
        });
    }
    Ok(roles)
}

async fn find_role_model<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<role::Model>> {
    Ok(entities::Role::find()
        .filter(role::Column::Name.eq(name))
        .one(db)
        .await?)
}

pub(super) async fn require_role_id<C: ConnectionTrait>(db: &C, name: &str) -> Result<Uuid> {
    find_role_model(db, name)
        .await?
        .map(|model| model.id)
        .ok_or_else(|| GatewayError::not_found(format!("Role {} not found", name)))
}

async fn permission_id<C: ConnectionTrait>(db: &C, name: &str) -> Result<Uuid> {
    if let Some(existing) = entities::Permission::find()
        .filter(permission::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing.id);
    }

    let id = Uuid::new_v4();
    entities::Permission::insert(permission::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
    })
    .exec(db)
    .await?;
    Ok(id)
}

impl SeaOrmDatabase {
    /// Create or replace a role, its policy and its permission set
    pub(crate) async fn upsert_role_row(
        &self,
        name: &str,
        rate_limit: RateLimitPolicy,
        permissions: &[String],
    ) -> Result<Role> {
        debug!("Upserting role: {}", name);

        let name = name.to_string();
        let permissions = permissions.to_vec();
        let (times, interval_ms) = role::policy_columns(&rate_limit);

        self.db
            .transaction::<_, Role, GatewayError>(|txn| {
                Box::pin(async move {
                    let role_id = match find_role_model(txn, &name).await? {
                        Some(existing) => {
                            let mut active: role::ActiveModel = existing.into();
                            active.rate_limit_times = Set(times);
                            active.rate_limit_interval_ms = Set(interval_ms);
                            let updated = active.update(txn).await?;

                            entities::RolePermission::delete_many()
                                .filter(role_permission::Column::RoleId.eq(updated.id))
                                .exec(txn)
                                .await?;
                            updated.id
                        }
                        None => {
                            let id = Uuid::new_v4();
                            entities::Role::insert(role::ActiveModel {
                                id: Set(id),
                                name: Set(name.clone()),
                                rate_limit_times: Set(times),
                                rate_limit_interval_ms: Set(interval_ms),
                                created_at: Set(chrono::Utc::now().into()),
                            })
                            .exec(txn)
                            .await?;
                            id
                        }
                    };

                    let mut linked = Vec::with_capacity(permissions.len());
                    for permission in &permissions {
                        let permission_id = permission_id(txn, permission).await?;
                        if linked.contains(&permission_id) {
                            continue;
                        }
                        linked.push(permission_id);
                        entities::RolePermission::insert(role_permission::ActiveModel {
                            id: NotSet,
                            role_id: Set(role_id),
                            permission_id: Set(permission_id),
                        })
                        .exec(txn)
                        .await?;
                    }

                    load_roles(txn, &[role_id])
                        .await?
                        .pop()
                        .ok_or_else(|| GatewayError::internal("Role vanished during upsert"))
                })
            })
            .await
            .map_err(GatewayError::from)
    }

    pub(crate) async fn find_role_row(&self, name: &str) -> Result<Option<Role>> {
        match find_role_model(&self.db, name).await? {
            Some(model) => Ok(load_roles(&self.db, &[model.id]).await?.pop()),
            None => Ok(None),
        }
    }

    pub(crate) async fn list_role_rows(&self) -> Result<Vec<Role>> {
        let ids: Vec<Uuid> = entities::Role::find()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| model.id)
            .collect();
        load_roles(&self.db, &ids).await
    }

    pub(crate) async fn list_permission_rows(&self) -> Result<Vec<Permission>> {
        Ok(entities::Permission::find()
            .order_by_asc(permission::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Permission::from)
            .collect())
    }
}
