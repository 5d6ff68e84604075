//! Handler-side access to what the security middleware recorded.
//!
//! After a `Success`, [`SecurityTransform`](super::middleware::SecurityTransform)
//! stores the [`User`] in the request extensions. An abstaining scheme leaves
//! nothing there, so the extractors below are where an anonymous request is
//! finally told apart from an authenticated one.

use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::http::error::AuthError;
use crate::http::security::User;

fn recorded_user<M: HttpMessage>(message: &M) -> Option<User> {
    message.extensions().get::<User>().cloned()
}

/// The principal an authentication scheme accepted.
///
/// Rejects the request with `401 Unauthorized` when no scheme produced a user,
/// which is what a handler behind an abstaining scheme sees.
///
/// ```ignore
/// use actix_apikey_core::http::security::AuthenticatedUser;
///
/// async fn whoami(user: AuthenticatedUser) -> impl Responder {
///     format!("{} via {}", user.get_username(), user.scheme())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    pub fn new(user: User) -> Self {
        AuthenticatedUser(user)
    }

    /// Name of the scheme that accepted the caller, empty if none was recorded.
    pub fn scheme(&self) -> &str {
        self.0.get_authentication_scheme().unwrap_or_default()
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

impl Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(recorded_user(req).map(AuthenticatedUser).ok_or(AuthError::Unauthorized))
    }
}

/// The principal if one was authenticated. Never rejects the request.
#[derive(Debug, Clone)]
pub struct OptionalUser(Option<User>);

impl OptionalUser {
    pub fn into_inner(self) -> Option<User> {
        self.0
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl Deref for OptionalUser {
    type Target = Option<User>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for OptionalUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalUser(recorded_user(req))))
    }
}

/// Reads the authentication outcome off any request type.
///
/// Implemented for every [`HttpMessage`], so handlers (`HttpRequest`) and
/// middleware placed after the security layer (`ServiceRequest`) read it the
/// same way.
pub trait SecurityExt {
    /// True once a scheme has accepted the caller.
    fn is_authenticated(&self) -> bool;

    /// Name of the scheme that accepted the caller.
    fn get_authentication_scheme(&self) -> Option<String>;
}

impl<M: HttpMessage> SecurityExt for M {
    fn is_authenticated(&self) -> bool {
        self.extensions().contains::<User>()
    }

    fn get_authentication_scheme(&self) -> Option<String> {
        self.extensions()
            .get::<User>()
            .and_then(|user| user.get_authentication_scheme().map(str::to_string))
    }
}
