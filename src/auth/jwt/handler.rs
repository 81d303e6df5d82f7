//! Core JWT handler implementation

use super::types::{Claims, JwtHandler, TokenPair};
use crate::config::AuthConfig;
use crate::utils::current_timestamp;
use crate::utils::error::{GatewayError, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

impl JwtHandler {
    /// Create a new JWT handler
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            access_ttl: config.access_token_ttl_secs,
            refresh_ttl: config.refresh_token_ttl_secs,
            issuer: config.issuer.clone(),
        }
    }

    /// Sign `claims` with `iat = now` and `exp = now + ttl`
    ///
    /// A `jti` is added when absent, so two tokens minted within the same
    /// second never compare equal.
    pub fn issue(&self, mut claims: Claims, ttl: Duration) -> Result<String> {
        let now = current_timestamp();
        claims.iat = Some(now);
        claims.exp = Some(now.saturating_add(ttl.as_secs()));
        if claims.jti.is_none() {
            claims.jti = Some(Uuid::new_v4().to_string());
        }
        if claims.iss.is_none() {
            claims.iss = self.issuer.clone();
        }

        let header = Header::new(self.algorithm);
        let token = encode(&header, &claims, &self.encoding_key).map_err(GatewayError::Jwt)?;
        Ok(token)
    }

    /// Verify the signature and return the claim set
    ///
    /// Checks run in order: signature and shape, then expiry, then subject.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry and required claims are checked below with our own errors
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!("JWT decoding failed: {}", e);
                GatewayError::MalformedToken
            })?
            .claims;

        let exp = claims.exp.ok_or_else(|| GatewayError::missing_claim("exp"))?;
        if exp <= current_timestamp() {
            return Err(GatewayError::ExpiredToken);
        }

        if claims.sub.as_deref().is_none_or(str::is_empty) {
            return Err(GatewayError::missing_claim("sub"));
        }

        Ok(claims)
    }

    /// Issue an access token and a refresh token for `username`
    pub fn create_token_pair(&self, username: &str, roles: Vec<String>) -> Result<TokenPair> {
        let access_token = self.issue(Claims::access(username, roles), self.access_ttl())?;
        let refresh_token = self.issue(Claims::refresh(username), self.refresh_ttl())?;

        debug!("Created token pair for user: {}", username);
        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in: self.access_ttl,
        })
    }

    /// Access token lifetime
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl)
    }

    /// Refresh token lifetime
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl)
    }
}
