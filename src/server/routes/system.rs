//! System configuration inspection

use super::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, web};

/// Effective configuration with secrets redacted
pub async fn config(state: web::Data<AppState>) -> Result<HttpResponse, GatewayError> {
    let config = state.config().redacted()?;
    Ok(ApiResponse::success(config).to_http_response())
}
