//! Profile of the calling user

use super::ApiResponse;
use crate::core::models::User;
use crate::core::rate_limiter::RateLimitPolicy;
use crate::server::middleware::AuthenticatedUser;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// What `GET /users/me` returns
#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    /// Role names in assignment order
    pub roles: Vec<String>,
    pub permissions: BTreeSet<String>,
    /// `None` when the caller is not limited
    pub rate_limit: Option<RateLimitPolicy>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user: &User, rate_limit: Option<RateLimitPolicy>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
            roles: user.role_names(),
            permissions: user.permissions(),
            rate_limit,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

pub async fn me(state: web::Data<AppState>, user: AuthenticatedUser) -> HttpResponse {
    let policy = state.rate_limiter.select_policy(Some(&user.0));
    ApiResponse::success(Profile::new(&user, policy)).to_http_response()
}
