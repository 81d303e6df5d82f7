//! Rate limiting middleware
//!
//! Runs before authentication. A valid bearer token makes the request count
//! against its user and that user's role policy; anything else is counted
//! against the caller address under the default policy. The resolved user is
//! left in request extensions for the authentication stage.

use crate::core::rate_limiter::{RateLimitResult, identity_key};
use crate::server::middleware::helpers::{AuthenticatedUser, bearer_token};
use crate::server::state::AppState;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::{HttpMessage, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::debug;

/// Rate limit middleware for Actix-web
pub struct RateLimitMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            };
            if !state.rate_limiter.is_enabled() {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            // Best effort: an unusable token only means the caller is anonymous here
            let user = match bearer_token(req.headers()) {
                Some(token) => match state.auth.authenticate_bearer(token).await {
                    Ok(user) => Some(user),
                    Err(e) => {
                        debug!("Counting {} as anonymous: {}", req.path(), e);
                        None
                    }
                },
                None => None,
            };

            let peer = req.peer_addr().map(|addr| addr.to_string());
            let identity = identity_key(user.as_ref(), req.headers(), peer.as_deref());
            let route = req.path().to_string();
            let outcome = state
                .rate_limiter
                .enforce(&identity, user.as_ref(), &route)
                .await;

            if let Some(user) = user {
                req.extensions_mut().insert(AuthenticatedUser(user));
            }

            match outcome {
                Ok(result) => {
                    let mut res = service.call(req).await?;
                    if let Some(result) = result {
                        insert_limit_headers(res.headers_mut(), &result);
                    }
                    Ok(res.map_into_left_body())
                }
                Err(e) => Ok(req.error_response(e).map_into_right_body()),
            }
        })
    }
}

fn insert_limit_headers(headers: &mut HeaderMap, result: &RateLimitResult) {
    headers.insert(
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderValue::from(result.limit),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from(result.remaining),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-reset"),
        HeaderValue::from(result.reset_after_secs),
    );
}
