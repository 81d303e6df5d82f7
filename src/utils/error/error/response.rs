//! HTTP response handling for errors

use super::types::GatewayError;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError};

impl GatewayError {
    /// Status code, machine-readable code and client-facing message
    ///
    /// Infrastructure variants hide their inner detail so that connection
    /// strings, SQL and hashes never reach a response body.
    fn response_parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            GatewayError::MissingToken => {
                (StatusCode::UNAUTHORIZED, "MISSING_TOKEN", self.to_string())
            }
            GatewayError::MalformedToken => {
                (StatusCode::UNAUTHORIZED, "MALFORMED_TOKEN", self.to_string())
            }
            GatewayError::ExpiredToken => {
                (StatusCode::UNAUTHORIZED, "EXPIRED_TOKEN", self.to_string())
            }
            GatewayError::MissingRequiredClaim(_) => (
                StatusCode::UNAUTHORIZED,
                "MISSING_REQUIRED_CLAIM",
                self.to_string(),
            ),
            GatewayError::CredentialsInvalid => (
                StatusCode::UNAUTHORIZED,
                "CREDENTIALS_INVALID",
                self.to_string(),
            ),
            GatewayError::InexistentUsername(_) => (
                StatusCode::UNAUTHORIZED,
                "INEXISTENT_USERNAME",
                self.to_string(),
            ),
            GatewayError::InactiveUser(_) => {
                (StatusCode::UNAUTHORIZED, "INACTIVE_USER", self.to_string())
            }
            GatewayError::InsufficientPrivileges => (
                StatusCode::FORBIDDEN,
                "INSUFFICIENT_PRIVILEGES",
                self.to_string(),
            ),
            GatewayError::TooManyRequests { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "TOO_MANY_REQUESTS",
                self.to_string(),
            ),
            GatewayError::InfrastructureTimeout(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "INFRASTRUCTURE_TIMEOUT",
                "A backing service did not respond in time".to_string(),
            ),
            GatewayError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
            }
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            GatewayError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", self.to_string()),
            GatewayError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database operation failed".to_string(),
            ),
            GatewayError::Redis(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CACHE_ERROR",
                "Cache operation failed".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        self.response_parts().1
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.response_parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.response_parts();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None,
            },
        };

        let mut builder = HttpResponse::build(status_code);
        match self {
            GatewayError::TooManyRequests { retry_after_secs } => {
                builder.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
            }
            e if e.is_authentication_failure() => {
                builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
            }
            _ => {}
        }

        builder.json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}
