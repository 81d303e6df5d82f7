//! Type conversions for GatewayError

use super::types::GatewayError;

impl From<argon2::password_hash::Error> for GatewayError {
    fn from(err: argon2::password_hash::Error) -> Self {
        GatewayError::Crypto(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for GatewayError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        GatewayError::InfrastructureTimeout("operation timed out".to_string())
    }
}

impl From<sea_orm::TransactionError<GatewayError>> for GatewayError {
    fn from(err: sea_orm::TransactionError<GatewayError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db) => GatewayError::Database(db),
            sea_orm::TransactionError::Transaction(inner) => inner,
        }
    }
}
