//! Health check endpoints

use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/liveness", web::get().to(liveness))
            .route("/readiness", web::get().to(readiness)),
    );
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
    pub git_hash: Cow<'static, str>,
    pub build_time: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentHealth>,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub credential_store: bool,
    pub counter_store: bool,
}

impl ComponentHealth {
    fn healthy(&self) -> bool {
        self.credential_store && self.counter_store
    }
}

impl HealthStatus {
    fn new(status: &'static str, components: Option<ComponentHealth>) -> Self {
        Self {
            status: Cow::Borrowed(status),
            timestamp: chrono::Utc::now(),
            version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
            git_hash: Cow::Borrowed(env!("GIT_HASH")),
            build_time: Cow::Borrowed(env!("BUILD_TIME")),
            components,
        }
    }
}

async fn check_components(state: &AppState) -> ComponentHealth {
    let credentials = state.storage.credentials.clone();
    let counters = state.storage.counters.clone();

    let credential_store = match state
        .retry
        .call("credential store health", || credentials.health_check())
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!("Credential store unhealthy: {}", e);
            false
        }
    };
    let counter_store = match state
        .retry
        .call("counter store health", || counters.health_check())
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!("Counter store unhealthy: {}", e);
            false
        }
    };

    ComponentHealth {
        credential_store,
        counter_store,
    }
}

/// Store health with build information; 503 when a store is down
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let components = check_components(&state).await;
    if components.healthy() {
        HttpResponse::Ok().json(HealthStatus::new("healthy", Some(components)))
    } else {
        HttpResponse::ServiceUnavailable().json(HealthStatus::new("degraded", Some(components)))
    }
}

/// The process is up
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus::new("alive", None))
}

/// The stores answer, so requests can be served
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    if check_components(&state).await.healthy() {
        HttpResponse::Ok().json(HealthStatus::new("ready", None))
    } else {
        HttpResponse::ServiceUnavailable().json(HealthStatus::new("not_ready", None))
    }
}
