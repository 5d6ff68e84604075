//! Contract between an authentication scheme and the security middleware.
//!
//! # Spring Equivalent
//! `AuthenticationProvider` / `AuthenticationEntryPoint`

use actix_web::dev::ServiceRequest;
use actix_web::http::header::HeaderMap;
use actix_web::ResponseError;
use futures_util::future::LocalBoxFuture;

use crate::http::security::user::User;

/// Outcome of one authentication attempt.
///
/// `Abstain` means the scheme found nothing it is responsible for, so a
/// pipeline may try another scheme or continue anonymously. `Fail` is a
/// definite rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticateResult<E> {
    Success(User),
    Fail(E),
    Abstain,
}

impl<E> AuthenticateResult<E> {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthenticateResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AuthenticateResult::Fail(_))
    }

    pub fn is_abstain(&self) -> bool {
        matches!(self, AuthenticateResult::Abstain)
    }

    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthenticateResult::Success(user) => Some(user),
            _ => None,
        }
    }

    /// The failure reason, if any.
    pub fn failure(&self) -> Option<&E> {
        match self {
            AuthenticateResult::Fail(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            AuthenticateResult::Success(user) => Some(user),
            _ => None,
        }
    }
}

/// One authentication scheme.
///
/// # Spring Equivalent
/// `AuthenticationProvider` combined with its `AuthenticationEntryPoint`
///
/// # Implementation Note
/// `authenticate` reads what it needs from the request before returning, so
/// the future owns its data and the middleware can keep using the request.
pub trait Authenticator {
    /// Failure reason, rendered as the 401 response.
    type Error: ResponseError + 'static;

    /// Name of the scheme, used in challenges and on authenticated users.
    fn scheme_name(&self) -> &str;

    /// Decides the outcome for one request.
    fn authenticate(&self, req: &ServiceRequest) -> LocalBoxFuture<'static, AuthenticateResult<Self::Error>>;

    /// Adds challenge headers to a 401 response.
    fn challenge(&self, headers: &mut HeaderMap);
}
