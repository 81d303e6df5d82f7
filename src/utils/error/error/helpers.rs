//! Helper functions for creating specific error types

use super::types::GatewayError;

/// Helper functions for creating specific errors
impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn crypto<S: Into<String>>(message: S) -> Self {
        Self::Crypto(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::InfrastructureTimeout(operation.into())
    }

    pub fn missing_claim<S: Into<String>>(claim: S) -> Self {
        Self::MissingRequiredClaim(claim.into())
    }

    pub fn too_many_requests(retry_after_secs: u64) -> Self {
        Self::TooManyRequests { retry_after_secs }
    }

    /// Whether this error is one of the authentication failures answered with 401
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingToken
                | Self::MalformedToken
                | Self::ExpiredToken
                | Self::MissingRequiredClaim(_)
                | Self::CredentialsInvalid
                | Self::InexistentUsername(_)
                | Self::InactiveUser(_)
        )
    }

    /// Whether a bounded internal retry may be attempted
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InfrastructureTimeout(_))
    }
}
