//! Per-route role and permission guard

use crate::auth::Requirement;
use crate::server::middleware::helpers::AuthenticatedUser;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::web;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// Guard wrapped around one resource or scope
///
/// The handler never runs unless the requirement holds.
#[derive(Clone)]
pub struct RbacGuard {
    requirement: Rc<Requirement>,
}

impl RbacGuard {
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement: Rc::new(requirement),
        }
    }

    /// Pass when the user holds any of `roles`
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Requirement::any_role(roles))
    }

    /// Pass when the user holds all of `permissions`
    pub fn all_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Requirement::all_permissions(permissions))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RbacGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RbacGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RbacGuardService {
            service,
            requirement: Rc::clone(&self.requirement),
        }))
    }
}

/// Service implementation for the RBAC guard
pub struct RbacGuardService<S> {
    service: S,
    requirement: Rc<Requirement>,
}

impl<S, B> Service<ServiceRequest> for RbacGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>();
        let decision = match (state, AuthenticatedUser::current(req.request())) {
            (Some(state), Some(user)) => state.auth.authorize(&user, &self.requirement),
            (None, _) => Err(GatewayError::internal("Application state is not configured")),
            (_, None) => Err(GatewayError::MissingToken),
        };

        match decision {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(e) => {
                let res = req.error_response(e).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
