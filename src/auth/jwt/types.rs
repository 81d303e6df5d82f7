//! JWT types and data structures

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

/// JWT handler for token operations
#[derive(Clone)]
pub struct JwtHandler {
    /// Encoding key for signing tokens
    pub(super) encoding_key: EncodingKey,
    /// Decoding key for verifying tokens
    pub(super) decoding_key: DecodingKey,
    /// JWT algorithm
    pub(super) algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub(super) access_ttl: u64,
    /// Refresh token lifetime in seconds
    pub(super) refresh_ttl: u64,
    /// Token issuer, checked on validation when set
    pub(super) issuer: Option<String>,
}

impl std::fmt::Debug for JwtHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtHandler")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("issuer", &self.issuer)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// JWT claims structure
///
/// Every field is optional on the wire so that a token missing a required
/// claim decodes and can be rejected with the claim's name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// JWT ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Token type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
    /// Role names at issuance, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl Claims {
    /// Claims for an access token
    pub fn access(username: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            sub: Some(username.into()),
            token_type: Some(TokenType::Access),
            roles: Some(roles),
            ..Self::default()
        }
    }

    /// Claims for a refresh token
    pub fn refresh(username: impl Into<String>) -> Self {
        Self {
            sub: Some(username.into()),
            token_type: Some(TokenType::Refresh),
            ..Self::default()
        }
    }

    /// Whether the token was minted for `expected`; untyped tokens pass
    pub fn is_type(&self, expected: TokenType) -> bool {
        self.token_type.is_none_or(|t| t == expected)
    }
}

/// Token type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Access token for API access
    Access,
    /// Refresh token for obtaining new access tokens
    Refresh,
}

/// Token pair (access + refresh)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}
