use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One authentication attempt
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "auth_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub success: bool,
    pub message: String,
    pub client_ip: String,
    pub endpoint: String,
    pub method: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<crate::core::models::AuthLogEntry> for ActiveModel {
    fn from(entry: crate::core::models::AuthLogEntry) -> Self {
        Self {
            id: sea_orm::NotSet,
            user_id: Set(entry.user_id),
            username: Set(entry.username),
            success: Set(entry.success),
            message: Set(entry.message),
            client_ip: Set(entry.client_ip),
            endpoint: Set(entry.endpoint),
            method: Set(entry.method),
            created_at: Set(entry.at.into()),
        }
    }
}
