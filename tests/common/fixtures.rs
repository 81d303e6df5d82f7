//! Test fixtures and request builders
//!
//! Fixtures build real stores and a real [`AppState`]; nothing is mocked.

use actix_web::http::header::AUTHORIZATION;
use actix_web::test::TestRequest;
use actix_web::web;
use authgate::auth::password::hash_password;
use authgate::config::CredentialBackend;
use authgate::core::models::{NewUser, User};
use authgate::storage::{CredentialStore, MemoryStore, StorageLayer, bootstrap};
use authgate::{AppState, Config, RateLimitPolicy};
use std::net::SocketAddr;
use std::sync::Arc;

/// Signing secret used by every fixture
pub const SECRET: &str = "integration-test-secret-0123456789abcdefgh";

/// Password of every fixture user
pub const PASSWORD: &str = "correct horse battery staple";

/// Address every request appears to come from
pub const PEER: &str = "198.51.100.20:41000";

/// Memory-backed configuration with a generous anonymous policy
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.gateway.auth.jwt_secret = SECRET.to_string();
    config.gateway.storage.backend = CredentialBackend::Memory;
    config.gateway.rate_limit.default_policy = RateLimitPolicy::per_minute(100).ok();
    config
}

/// One gateway over one shared in-process store
pub struct TestGateway {
    pub store: Arc<MemoryStore>,
    pub state: web::Data<AppState>,
}

impl TestGateway {
    /// Gateway over [`test_config`] with the default roles seeded
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        bootstrap::run(store.as_ref(), &config.gateway.bootstrap)
            .await
            .expect("Failed to seed roles");

        let state = AppState::new(config, StorageLayer::from_memory(store.clone()))
            .expect("Failed to build application state");

        Self {
            store,
            state: web::Data::new(state),
        }
    }

    pub fn data(&self) -> web::Data<AppState> {
        self.state.clone()
    }

    /// Create an active user with [`PASSWORD`] and assign `roles` in order
    pub async fn add_user(&self, username: &str, roles: &[&str]) -> User {
        let hash = hash_password(PASSWORD).expect("Failed to hash password");
        let mut user = self
            .store
            .create_user(NewUser::new(username, format!("{username}@example.com"), hash))
            .await
            .expect("Failed to create user");

        for role in roles {
            user = self
                .store
                .assign_role(username, role)
                .await
                .expect("Failed to assign role");
        }
        user
    }

    /// Replace the policy of a seeded role, keeping its permissions
    pub async fn set_role_policy(&self, role: &str, policy: RateLimitPolicy) {
        let existing = self
            .store
            .find_role_by_name(role)
            .await
            .unwrap()
            .expect("Role is not seeded");
        self.store
            .upsert_role(role, policy, &existing.permissions)
            .await
            .expect("Failed to update role");
    }

    /// A signed access token for `username` without going through login
    pub fn access_token(&self, username: &str) -> String {
        self.state
            .auth
            .jwt()
            .create_token_pair(username, Vec::new())
            .expect("Failed to issue token")
            .access_token
    }
}

fn peer() -> SocketAddr {
    PEER.parse().unwrap()
}

/// `POST /auth/token` with form credentials
pub fn token_request(username: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/auth/token")
        .peer_addr(peer())
        .set_form([("username", username), ("password", password)])
}

/// `POST /auth/refresh` with a JSON body
pub fn refresh_request(refresh_token: &str) -> TestRequest {
    TestRequest::post()
        .uri("/auth/refresh")
        .peer_addr(peer())
        .set_json(serde_json::json!({ "refresh_token": refresh_token }))
}

pub fn get(path: &str) -> TestRequest {
    TestRequest::get().uri(path).peer_addr(peer())
}

pub fn with_bearer(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}
