//! Who a request is counted against

use crate::core::models::User;
use actix_web::http::header::HeaderMap;
use uuid::Uuid;

/// Counter identity for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitIdentity {
    /// `user:<username>` or `ip:<address>`
    pub key: String,
    pub user_id: Option<Uuid>,
}

impl RateLimitIdentity {
    pub fn for_user(user: &User) -> Self {
        Self {
            key: format!("user:{}", user.username),
            user_id: Some(user.id),
        }
    }

    pub fn anonymous(client_ip: &str) -> Self {
        Self {
            key: format!("ip:{}", client_ip),
            user_id: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Resolve the caller address
///
/// Order: first `X-Forwarded-For` entry, then `X-Real-IP`, then the peer address.
pub fn client_ip(headers: &HeaderMap, peer_addr: Option<&str>) -> String {
    if let Some(forwarded_for) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = forwarded_for.split(',').next() {
            let ip = first_ip.trim();
            if !ip.is_empty() && ip != "unknown" {
                return ip.to_owned();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let ip = real_ip.trim();
        if !ip.is_empty() && ip != "unknown" {
            return ip.to_owned();
        }
    }

    peer_addr
        .map(strip_port)
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Username for authenticated callers, resolved network address otherwise
pub fn identity_key(
    user: Option<&User>,
    headers: &HeaderMap,
    peer_addr: Option<&str>,
) -> RateLimitIdentity {
    match user {
        Some(user) => RateLimitIdentity::for_user(user),
        None => RateLimitIdentity::anonymous(&client_ip(headers, peer_addr)),
    }
}

fn strip_port(addr: &str) -> String {
    match addr.parse::<std::net::SocketAddr>() {
        Ok(socket) => socket.ip().to_string(),
        Err(_) => addr.to_owned(),
    }
}
