//! User and role administration

use super::ApiResponse;
use crate::server::middleware::AuthenticatedUser;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

/// Activate or deactivate a user
pub async fn set_active(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<ActiveRequest>,
) -> Result<HttpResponse, GatewayError> {
    let username = path.into_inner();
    let is_active = body.is_active;
    let store = state.storage.credentials.clone();

    let user = state
        .retry
        .call("set user active", || store.set_user_active(&username, is_active))
        .await?;

    info!(
        "{} set {} active={}",
        admin.username, user.username, user.is_active
    );
    Ok(ApiResponse::success(user).to_http_response())
}

/// Give a user one more role
pub async fn assign_role(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<RoleRequest>,
) -> Result<HttpResponse, GatewayError> {
    let username = path.into_inner();
    let store = state.storage.credentials.clone();

    let user = state
        .retry
        .call("assign role", || store.assign_role(&username, &body.role))
        .await?;

    info!("{} assigned {} to {}", admin.username, body.role, user.username);
    Ok(ApiResponse::success(user).to_http_response())
}

pub async fn revoke_role(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, GatewayError> {
    let (username, role) = path.into_inner();
    let store = state.storage.credentials.clone();

    let user = state
        .retry
        .call("revoke role", || store.revoke_role(&username, &role))
        .await?;

    info!("{} revoked {} from {}", admin.username, role, user.username);
    Ok(ApiResponse::success(user).to_http_response())
}

/// Roles with their permissions and policies
pub async fn list_roles(state: web::Data<AppState>) -> Result<HttpResponse, GatewayError> {
    let store = state.storage.credentials.clone();
    let roles = state.retry.call("list roles", || store.list_roles()).await?;

    let meta = serde_json::json!({ "total": roles.len() });
    Ok(ApiResponse::success_with_meta(roles, meta).to_http_response())
}
