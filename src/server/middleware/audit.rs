//! Conditional request audit
//!
//! Outermost pipeline stage. Writes one entry after the response is known
//! when the method is listed or the status reaches the threshold, unless the
//! path is exempt. A failed write is logged and the response is returned
//! unchanged.

use crate::core::models::RequestLogEntry;
use crate::core::rate_limiter::client_ip;
use crate::server::middleware::helpers::AuthenticatedUser;
use crate::server::state::AppState;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::web;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use tracing::warn;

/// Request audit middleware for Actix-web
pub struct AuditMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuditMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuditMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuditMiddlewareService { service }))
    }
}

/// Service implementation for audit middleware
pub struct AuditMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuditMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let query = req.query_string().to_string();
        let peer = req.peer_addr().map(|addr| addr.to_string());
        let ip = client_ip(req.headers(), peer.as_deref());

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;

            if let Some(state) = state {
                let (status, user) = match &res {
                    Ok(res) => (res.status(), AuthenticatedUser::current(res.request())),
                    Err(e) => (e.as_response_error().status_code(), None),
                };
                if should_audit(&state, &method, &path, status) {
                    let entry = RequestLogEntry {
                        user_id: user.as_ref().map(|u| u.id),
                        identity: match &user {
                            Some(user) => user.username.clone(),
                            None => format!("anonymous:{}", ip),
                        },
                        client_ip: ip,
                        method,
                        path,
                        query: (!query.is_empty()).then_some(query),
                        status: status.as_u16(),
                        duration_ms: u64::try_from(start_time.elapsed().as_millis())
                            .unwrap_or(u64::MAX),
                        at: chrono::Utc::now(),
                    };
                    let audit = state.storage.audit.clone();
                    let written = state
                        .retry
                        .call("request audit", || audit.record_request(entry.clone()))
                        .await;
                    if let Err(e) = written {
                        warn!("Failed to record request audit: {}", e);
                    }
                }
            }

            res
        })
    }
}

/// Listed method or status at the threshold, on a non-exempt path
fn should_audit(
    state: &AppState,
    method: &str,
    path: &str,
    status: StatusCode,
) -> bool {
    let config = &state.config.gateway.audit;
    if !config.enabled || state.audit_exempt.is_match(path) {
        return false;
    }

    config.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
        || status.as_u16() >= config.min_status
}
