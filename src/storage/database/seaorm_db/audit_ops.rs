use crate::core::models::{AuthLogEntry, RateLimitLogEntry, RequestLogEntry};
use crate::storage::AuditStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use sea_orm::*;

use super::super::entities::{self, auth_log, rate_limit_log, request_log};
use super::types::SeaOrmDatabase;

#[async_trait]
impl AuditStore for SeaOrmDatabase {
    async fn record_request(&self, entry: RequestLogEntry) -> Result<()> {
        entities::RequestLog::insert(request_log::ActiveModel::from(entry))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn record_auth(&self, entry: AuthLogEntry) -> Result<()> {
        entities::AuthLog::insert(auth_log::ActiveModel::from(entry))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn record_rate_limit(&self, entry: RateLimitLogEntry) -> Result<()> {
        entities::RateLimitLog::insert(rate_limit_log::ActiveModel::from(entry))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

impl SeaOrmDatabase {
    /// Number of stored request audit rows
    pub async fn request_log_count(&self) -> Result<u64> {
        Ok(entities::RequestLog::find().count(&self.db).await?)
    }

    /// Number of stored auth audit rows
    pub async fn auth_log_count(&self) -> Result<u64> {
        Ok(entities::AuthLog::find().count(&self.db).await?)
    }

    /// Number of stored rate-limit denial rows
    pub async fn rate_limit_log_count(&self) -> Result<u64> {
        Ok(entities::RateLimitLog::find().count(&self.db).await?)
    }
}
