//! Token endpoints

use super::auth_context;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::debug;

/// Configure token routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/token", web::post().to(token))
            .route("/refresh", web::post().to(refresh)),
    );
}

/// Password grant form
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

/// Refresh request body
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Exchange a username and password for a token pair
pub async fn token(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<TokenForm>,
) -> Result<HttpResponse, GatewayError> {
    let form = form.into_inner();
    debug!("Token requested for {}", form.username);

    let pair = state
        .auth
        .login(&form.username, &form.password, &auth_context(&req))
        .await?;
    Ok(HttpResponse::Ok().json(pair))
}

/// Trade the current refresh token for a new pair
pub async fn refresh(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<RefreshRequest>,
) -> Result<HttpResponse, GatewayError> {
    let pair = state
        .auth
        .rotate_refresh(&body.refresh_token, &auth_context(&req))
        .await?;
    Ok(HttpResponse::Ok().json(pair))
}
