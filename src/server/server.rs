//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, CounterBackend, ServerConfig};
use crate::server::middleware::{AuditMiddleware, AuthMiddleware, RateLimitMiddleware};
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::{StorageLayer, bootstrap};
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Connect the configured stores, seed them and build the server
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let storage =
            StorageLayer::new(&config.gateway.storage, config.gateway.rate_limit.backend).await?;
        Self::with_storage(config, storage).await
    }

    /// Build the server on already-connected stores
    pub async fn with_storage(config: &Config, storage: StorageLayer) -> Result<Self> {
        bootstrap::run(storage.credentials.as_ref(), &config.gateway.bootstrap).await?;
        let state = AppState::new(config.clone(), storage)?;

        Ok(Self {
            config: config.gateway.server.clone(),
            state,
        })
    }

    /// Create the Actix-web application
    ///
    /// Stages run outermost first: request audit, rate limiting,
    /// authentication, then the per-route RBAC guards.
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let cors_config = &state.config.gateway.server.cors;
        let mut cors = Cors::default();

        if cors_config.enabled {
            if cors_config.allows_all_origins() {
                cors = cors.allow_any_origin();
            } else {
                for origin in &cors_config.allowed_origins {
                    cors = cors.allowed_origin(origin);
                }
            }
            cors = cors
                .allow_any_method()
                .allow_any_header()
                .max_age(cors_config.max_age);
        }

        App::new()
            .app_data(state)
            .configure(routes::configure)
            .wrap(AuthMiddleware)
            .wrap(RateLimitMiddleware)
            .wrap(AuditMiddleware)
            .wrap(DefaultHeaders::new().add(("Server", "authgate")))
            .wrap(cors)
            .wrap(TracingLogger::default())
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let rate_limit = &self.state.config.gateway.rate_limit;
        if rate_limit.enabled && rate_limit.backend == CounterBackend::Memory {
            Arc::clone(&self.state.rate_limiter).start_cleanup_task();
        }

        let state = web::Data::new(self.state);
        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .client_request_timeout(Duration::from_secs(self.config.timeout));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| {
                error!("Failed to bind {}: {}", bind_addr, e);
                GatewayError::Io(e)
            })?
            .run();

        info!("HTTP server listening on {}", bind_addr);
        server.await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
