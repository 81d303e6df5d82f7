use crate::core::rate_limiter::RateLimitPolicy;
use crate::utils::error::GatewayError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Role database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub name: String,

    /// Requests allowed per window
    pub rate_limit_times: i32,

    /// Window length in milliseconds
    pub rate_limit_interval_ms: i64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,
    #[sea_orm(has_many = "super::role_permission::Entity")]
    RolePermissions,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl Related<super::role_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RolePermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decode the stored policy columns
    pub fn rate_limit(&self) -> crate::utils::error::Result<RateLimitPolicy> {
        let times = u32::try_from(self.rate_limit_times).map_err(|_| {
            GatewayError::internal(format!("Role {} has a negative rate limit", self.name))
        })?;
        let interval = Duration::from_millis(self.rate_limit_interval_ms.max(0) as u64);
        RateLimitPolicy::new(times, interval)
    }
}

/// Split a policy into its stored columns
pub fn policy_columns(policy: &RateLimitPolicy) -> (i32, i64) {
    (
        i32::try_from(policy.times()).unwrap_or(i32::MAX),
        i64::try_from(policy.interval().as_millis()).unwrap_or(i64::MAX),
    )
}
