//! Sample business endpoints behind permission guards

use super::ApiResponse;
use crate::server::middleware::AuthenticatedUser;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewContent {
    pub title: String,
    pub body: String,
}

fn sample(title: &str, author: &str) -> ContentItem {
    ContentItem {
        id: Uuid::new_v4(),
        title: title.to_string(),
        body: String::new(),
        author: author.to_string(),
        created_at: Utc::now(),
    }
}

pub async fn list(user: AuthenticatedUser) -> HttpResponse {
    let items = vec![sample("Welcome", "system"), sample("Getting started", "system")];
    let meta = serde_json::json!({ "viewer": user.username });
    ApiResponse::success_with_meta(items, meta).to_http_response()
}

pub async fn create(
    user: AuthenticatedUser,
    body: web::Json<NewContent>,
) -> Result<HttpResponse, GatewayError> {
    let NewContent { title, body } = body.into_inner();
    if title.trim().is_empty() {
        return Err(GatewayError::validation("Title cannot be empty"));
    }

    let item = ContentItem {
        id: Uuid::new_v4(),
        title,
        body,
        author: user.username.clone(),
        created_at: Utc::now(),
    };
    Ok(HttpResponse::Created().json(ApiResponse::success(item)))
}

/// Public listing, rate limited but not authenticated
pub async fn public_list() -> HttpResponse {
    ApiResponse::success(vec![sample("Welcome", "system")]).to_http_response()
}
