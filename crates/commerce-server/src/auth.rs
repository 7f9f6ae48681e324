//! Bearer-token authentication.
//!
//! The middleware resolves `Authorization: Token <key>` (the header
//! scheme of the original API; `Bearer` is accepted too) against the
//! token store and inserts an `AuthenticatedUser` into the request
//! extensions. Handlers that need an identity take it as an explicit
//! argument via `FromRequest` — a missing or unresolvable token
//! surfaces as 401 there, never ambiently.

use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ok, ready, LocalBoxFuture, Ready};

use commerce_core::traits::storage::IIdentityStore;
use commerce_storage::CommerceStorageEngine;

use crate::errors::ApiError;

/// Resolved caller identity, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
}

impl AuthenticatedUser {
    /// Authorization check for staff-only writes.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(ApiError::AuthorizationError(format!(
                "staff access required, {} is not staff",
                self.username
            )))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or(ApiError::AuthenticationError),
        )
    }
}

/// Authentication middleware.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let key = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Token ").or_else(|| h.strip_prefix("Bearer ")));

            if let Some(key) = key {
                let resolved = req
                    .app_data::<web::Data<CommerceStorageEngine>>()
                    .and_then(|store| store.resolve_token(key).ok().flatten());

                match resolved {
                    Some(user) => {
                        req.extensions_mut().insert(AuthenticatedUser {
                            id: user.id,
                            username: user.username,
                            is_staff: user.is_staff,
                        });
                    }
                    None => {
                        tracing::debug!("unresolvable bearer token");
                    }
                }
            }

            service.call(req).await
        })
    }
}
