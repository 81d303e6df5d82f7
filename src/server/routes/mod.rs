//! HTTP route modules
//!
//! Every resource is registered here so that the RBAC guard for each one is
//! visible next to its path.

pub mod admin;
pub mod auth;
pub mod content;
pub mod health;
pub mod system;
pub mod users;

use crate::auth::AuthContext;
use crate::core::rate_limiter::client_ip;
use crate::server::middleware::RbacGuard;
use actix_web::{HttpRequest, HttpResponse, guard, web};

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: None,
        }
    }

    /// Create a successful response with metadata
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: Some(meta),
        }
    }

    /// 200 with this response as the JSON body
    pub fn to_http_response(&self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

/// Caller address, path and method of `req` for the auth audit trail
pub(crate) fn auth_context(req: &HttpRequest) -> AuthContext {
    let peer = req.peer_addr().map(|addr| addr.to_string());
    AuthContext::new(
        client_ip(req.headers(), peer.as_deref()),
        req.path(),
        req.method().as_str(),
    )
}

/// Register every route with its guard
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    auth::configure_routes(cfg);

    cfg.route("/users/me", web::get().to(users::me))
        .service(
            web::resource("/admin/users/{username}/active")
                .wrap(RbacGuard::any_role(["SuperAdmin", "Admin"]))
                .route(web::put().to(admin::set_active)),
        )
        .service(
            web::resource("/admin/users/{username}/roles")
                .wrap(RbacGuard::all_permissions(["manage_users", "manage_roles"]))
                .route(web::post().to(admin::assign_role)),
        )
        .service(
            web::resource("/admin/users/{username}/roles/{role}")
                .wrap(RbacGuard::all_permissions(["manage_users", "manage_roles"]))
                .route(web::delete().to(admin::revoke_role)),
        )
        .service(
            web::resource("/admin/roles")
                .wrap(RbacGuard::all_permissions(["manage_roles"]))
                .route(web::get().to(admin::list_roles)),
        )
        .service(
            web::resource("/system/config")
                .wrap(RbacGuard::any_role(["SuperAdmin"]))
                .route(web::get().to(system::config)),
        )
        // Same path, different requirement per method
        .service(
            web::resource("/content")
                .guard(guard::Get())
                .wrap(RbacGuard::all_permissions(["view_content"]))
                .route(web::get().to(content::list)),
        )
        .service(
            web::resource("/content")
                .guard(guard::Post())
                .wrap(RbacGuard::all_permissions(["create_content"]))
                .route(web::post().to(content::create)),
        )
        .route(
            "/public/content",
            web::get().to(content::public_list),
        );
}
