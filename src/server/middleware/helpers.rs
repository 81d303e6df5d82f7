//! Helper functions for middleware

use crate::auth::jwt::extract_bearer;
use crate::core::models::User;
use crate::utils::error::{GatewayError, Result};
use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{Ready, ready};
use regex::RegexSet;

/// Glob allow-list compiled once at startup
///
/// `*` matches any run of characters including `/`, `?` matches one
/// character; everything else is literal and the whole path must match.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    patterns: Vec<String>,
    set: RegexSet,
}

impl RouteMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let regexes: Vec<String> = patterns.iter().map(|p| glob_to_regex(p)).collect();
        let set = RegexSet::new(&regexes)
            .map_err(|e| GatewayError::config(format!("Invalid route pattern: {}", e)))?;
        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::with_capacity(glob.len() + 8);
    regex.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');
    regex
}

/// Bearer token from the `Authorization` header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer)
}

/// The user resolved for this request, stored in request extensions
///
/// Extracting it in a handler fails with `MissingToken` when the request
/// was not authenticated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    /// The user attached to `req`, if any
    pub fn current(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<AuthenticatedUser>().map(|u| u.0.clone())
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = GatewayError;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or(GatewayError::MissingToken),
        )
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}
