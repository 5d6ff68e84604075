//! Security middleware for Actix Web.
//!
//! # Spring Equivalent
//! `SecurityFilterChain` / `FilterChainProxy`

use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse, ResponseError};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::error::AuthError;
use crate::http::security::config::{AuthenticateResult, Authenticator};

/// Security middleware factory.
///
/// Runs one [`Authenticator`] per request:
/// - `Success`: the user is stored in request extensions and the request
///   continues.
/// - `Fail`: the request stops with the error's 401 response plus the
///   scheme's challenge headers.
/// - `Abstain`: the request continues anonymously, or gets a 401 challenge
///   when authentication is required.
///
/// # Spring Equivalent
/// `SecurityFilterChain`
///
/// # Example
/// ```ignore
/// let authenticator = ApiKeyAuthenticator::new(ApiKeyConfig::new(), repository)?;
///
/// HttpServer::new(move || {
///     App::new().wrap(
///         SecurityTransform::new(authenticator.clone())
///             .require_authentication(true)
///     )
/// })
/// ```
pub struct SecurityTransform<A> {
    authenticator: Rc<A>,
    require_authentication: bool,
}

impl<A> SecurityTransform<A> {
    pub fn new(authenticator: A) -> Self {
        SecurityTransform {
            authenticator: Rc::new(authenticator),
            require_authentication: false,
        }
    }

    /// Rejects requests the authenticator abstains on.
    pub fn require_authentication(mut self, required: bool) -> Self {
        self.require_authentication = required;
        self
    }
}

impl<S, B, A> Transform<S, ServiceRequest> for SecurityTransform<A>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    A: Authenticator + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecurityService<A, S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityService {
            authenticator: Rc::clone(&self.authenticator),
            require_authentication: self.require_authentication,
            service: Rc::new(service),
        })
    }
}

/// Security middleware service.
///
/// # Spring Equivalent
/// `FilterChainProxy`
pub struct SecurityService<A, S> {
    authenticator: Rc<A>,
    require_authentication: bool,
    service: Rc<S>,
}

impl<A, S, B> Service<ServiceRequest> for SecurityService<A, S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    A: Authenticator + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authenticator = Rc::clone(&self.authenticator);
        let require_authentication = self.require_authentication;
        let outcome = authenticator.authenticate(&req);

        Box::pin(async move {
            let response = match outcome.await {
                AuthenticateResult::Success(user) => {
                    // Handlers read it back through the AuthenticatedUser extractor.
                    req.extensions_mut().insert(user);
                    None
                }
                AuthenticateResult::Fail(err) => Some(err.error_response()),
                AuthenticateResult::Abstain if require_authentication => {
                    tracing::debug!(
                        scheme = authenticator.scheme_name(),
                        path = req.path(),
                        "no credentials for a protected route"
                    );
                    Some(AuthError::Unauthorized.error_response())
                }
                AuthenticateResult::Abstain => None,
            };

            match response {
                Some(response) => Ok(req
                    .into_response(challenge(authenticator.as_ref(), response))
                    .map_into_right_body()),
                None => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

fn challenge<A: Authenticator>(authenticator: &A, mut response: HttpResponse) -> HttpResponse {
    authenticator.challenge(response.headers_mut());
    response
}
