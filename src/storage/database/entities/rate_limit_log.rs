use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One rate-limit denial
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rate_limit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub identity: String,
    pub route: String,
    /// Human-readable policy, e.g. "10 per 60s"
    pub policy: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<crate::core::models::RateLimitLogEntry> for ActiveModel {
    fn from(entry: crate::core::models::RateLimitLogEntry) -> Self {
        Self {
            id: sea_orm::NotSet,
            user_id: Set(entry.user_id),
            identity: Set(entry.identity),
            route: Set(entry.route),
            policy: Set(entry.policy.to_string()),
            created_at: Set(entry.at.into()),
        }
    }
}
