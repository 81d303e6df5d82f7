//! Core authentication system implementation

use super::jwt::{JwtHandler, TokenPair, TokenType};
use super::password::verify_password;
use super::rbac::{RbacSystem, Requirement};
use crate::config::AuthConfig;
use crate::core::models::{AuthLogEntry, User};
use crate::storage::{AuditStore, CredentialStore};
use crate::utils::error::{GatewayError, Result, RetryPolicy};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where an authentication attempt came from, for the auth audit trail
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub client_ip: String,
    pub endpoint: String,
    pub method: String,
}

impl AuthContext {
    pub fn new(
        client_ip: impl Into<String>,
        endpoint: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            client_ip: client_ip.into(),
            endpoint: endpoint.into(),
            method: method.into(),
        }
    }
}

/// Main authentication system
#[derive(Clone)]
pub struct AuthSystem {
    /// Authentication configuration
    config: Arc<AuthConfig>,
    /// Users, roles and cached tokens
    store: Arc<dyn CredentialStore>,
    /// Sink for login and refresh attempts
    audit: Arc<dyn AuditStore>,
    /// JWT handler
    jwt: Arc<JwtHandler>,
    /// RBAC system
    rbac: RbacSystem,
    /// Deadline and retry bound for store calls
    retry: RetryPolicy,
}

impl AuthSystem {
    /// Create a new authentication system
    pub fn new(
        config: &AuthConfig,
        store: Arc<dyn CredentialStore>,
        audit: Arc<dyn AuditStore>,
        retry: RetryPolicy,
    ) -> Self {
        info!("Initializing authentication system");

        Self {
            config: Arc::new(config.clone()),
            store,
            audit,
            jwt: Arc::new(JwtHandler::new(config)),
            rbac: RbacSystem::new(),
            retry,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn jwt(&self) -> &JwtHandler {
        &self.jwt
    }

    /// Check a password and issue a fresh token pair
    ///
    /// The new pair replaces whatever tokens were cached on the user, so any
    /// earlier refresh token stops working.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        ctx: &AuthContext,
    ) -> Result<TokenPair> {
        let outcome = self.try_login(username, password).await;
        self.record_attempt(ctx, Some(username), outcome.as_ref().map(|(user, _)| user))
            .await;
        outcome.map(|(_, pair)| pair)
    }

    async fn try_login(&self, username: &str, password: &str) -> Result<(User, TokenPair)> {
        debug!("Login attempt for {}", username);

        let user = self
            .retry
            .call("find user", || self.store.find_user_by_username(username))
            .await?
            .ok_or_else(|| GatewayError::InexistentUsername(username.to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(GatewayError::CredentialsInvalid);
        }
        if !user.is_active {
            return Err(GatewayError::InactiveUser(user.username.clone()));
        }

        let pair = self.jwt.create_token_pair(&user.username, user.role_names())?;
        self.retry
            .call("record login", || {
                self.store
                    .record_login(user.id, &pair.access_token, &pair.refresh_token)
            })
            .await?;

        info!("User {} logged in", user.username);
        Ok((user, pair))
    }

    /// Exchange the current refresh token for a new pair
    ///
    /// The presented token must equal the one cached on the user. The swap is
    /// a compare-and-swap on that cached value: of two concurrent rotations
    /// with the same token exactly one succeeds.
    pub async fn rotate_refresh(&self, presented: &str, ctx: &AuthContext) -> Result<TokenPair> {
        let outcome = self.try_rotate(presented).await;
        let username = outcome.as_ref().ok().map(|(user, _)| user.username.as_str());
        self.record_attempt(ctx, username, outcome.as_ref().map(|(user, _)| user))
            .await;
        outcome.map(|(_, pair)| pair)
    }

    async fn try_rotate(&self, presented: &str) -> Result<(User, TokenPair)> {
        let user = self
            .retry
            .call("find user by refresh token", || {
                self.store.find_user_by_refresh_token(presented)
            })
            .await?
            .ok_or(GatewayError::CredentialsInvalid)?;

        let claims = self.jwt.validate(presented).map_err(|e| match e {
            GatewayError::ExpiredToken => GatewayError::ExpiredToken,
            _ => GatewayError::CredentialsInvalid,
        })?;

        if claims.sub.as_deref() != Some(user.username.as_str()) {
            warn!("Refresh token subject does not match its owner");
            return Err(GatewayError::CredentialsInvalid);
        }
        if !claims.is_type(TokenType::Refresh) {
            return Err(GatewayError::CredentialsInvalid);
        }
        if !user.is_active {
            return Err(GatewayError::InactiveUser(user.username.clone()));
        }

        let pair = self.jwt.create_token_pair(&user.username, user.role_names())?;
        let swapped = self
            .retry
            .call("rotate refresh token", || {
                self.store
                    .swap_tokens(user.id, presented, &pair.access_token, &pair.refresh_token)
            })
            .await?;

        if !swapped {
            debug!("Lost refresh rotation race for {}", user.username);
            return Err(GatewayError::CredentialsInvalid);
        }

        info!("Rotated tokens for {}", user.username);
        Ok((user, pair))
    }

    /// Resolve a bearer access token to an active user
    pub async fn authenticate_bearer(&self, token: &str) -> Result<User> {
        let claims = self.jwt.validate(token)?;
        if !claims.is_type(TokenType::Access) {
            return Err(GatewayError::CredentialsInvalid);
        }

        let username = claims.sub.unwrap_or_default();
        let user = self
            .retry
            .call("find user", || self.store.find_user_by_username(&username))
            .await?
            .ok_or_else(|| GatewayError::InexistentUsername(username.clone()))?;

        if !user.is_active {
            return Err(GatewayError::InactiveUser(user.username));
        }
        Ok(user)
    }

    /// Check a route requirement against an authenticated user
    pub fn authorize(&self, user: &User, requirement: &Requirement) -> Result<()> {
        self.rbac.authorize(user, requirement)
    }

    async fn record_attempt(
        &self,
        ctx: &AuthContext,
        username: Option<&str>,
        outcome: std::result::Result<&User, &GatewayError>,
    ) {
        let entry = AuthLogEntry {
            user_id: outcome.ok().map(|user| user.id),
            username: username.map(str::to_string),
            success: outcome.is_ok(),
            message: match outcome {
                Ok(_) => "ok".to_string(),
                Err(e) => e.to_string(),
            },
            client_ip: ctx.client_ip.clone(),
            endpoint: ctx.endpoint.clone(),
            method: ctx.method.clone(),
            at: chrono::Utc::now(),
        };

        if let Err(e) = self.audit.record_auth(entry).await {
            warn!("Failed to record auth attempt: {}", e);
        }
    }
}

impl std::fmt::Debug for AuthSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSystem")
            .field("jwt", &self.jwt)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
