use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One audited request
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "request_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub identity: String,
    pub client_ip: String,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub status: i32,
    pub duration_ms: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<crate::core::models::RequestLogEntry> for ActiveModel {
    fn from(entry: crate::core::models::RequestLogEntry) -> Self {
        Self {
            id: sea_orm::NotSet,
            user_id: Set(entry.user_id),
            identity: Set(entry.identity),
            client_ip: Set(entry.client_ip),
            method: Set(entry.method),
            path: Set(entry.path),
            query: Set(entry.query),
            status: Set(i32::from(entry.status)),
            duration_ms: Set(i64::try_from(entry.duration_ms).unwrap_or(i64::MAX)),
            created_at: Set(entry.at.into()),
        }
    }
}
