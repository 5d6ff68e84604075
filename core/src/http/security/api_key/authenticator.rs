//! API Key authenticator implementation.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use actix_web::dev::ServiceRequest;
use actix_web::http::header::{HeaderMap, HeaderValue, WWW_AUTHENTICATE};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

use super::config::{ApiKeyConfig, ApiKeyConfigError};
use super::error::ApiKeyError;
use super::events::{ApiKeyAuthenticationEvents, DefaultApiKeyEvents};
use super::locator::ApiKeyLocator;
use super::request::RequestView;
use super::validator::ApiKeyValidator;
use crate::http::security::config::{AuthenticateResult, Authenticator};
use crate::http::security::User;

/// Scheme name used when none is given.
pub const DEFAULT_SCHEME_NAME: &str = "ApiKey";

/// Authenticator that validates API keys from requests.
///
/// Finds a candidate key in the locations an [`ApiKeyConfig`] allows, hands
/// it to an [`ApiKeyValidator`] and folds the answer into an
/// [`AuthenticateResult`]:
///
/// | Request | Outcome |
/// |---------|---------|
/// | key found, validator returns a user | `Success` |
/// | key found, validator rejects it | `Fail(InvalidKey)` |
/// | key found, validator errors or panics | `Fail(ValidatorFault)` |
/// | no key, query lookup enabled | `Fail(MissingKey)` |
/// | no key, header lookup only | `Abstain` |
///
/// Cloning is cheap; clones share the validator and the events object.
///
/// # Example
///
/// ```ignore
/// use actix_apikey_core::http::security::api_key::{
///     ApiKeyAuthenticator, ApiKeyConfig, ApiKey, InMemoryApiKeyRepository,
/// };
///
/// let repository = InMemoryApiKeyRepository::new()
///     .with_key(ApiKey::new("sk_live_abc123")
///         .roles(vec!["API_USER".into()])
///         .authorities(vec!["api:read".into()]));
///
/// let authenticator = ApiKeyAuthenticator::new(ApiKeyConfig::new(), repository)?
///     .scheme_name("ServiceKey")?;
/// ```
#[derive(Clone)]
pub struct ApiKeyAuthenticator {
    config: Arc<ApiKeyConfig>,
    validator: Arc<dyn ApiKeyValidator>,
    events: Arc<dyn ApiKeyAuthenticationEvents>,
    scheme_name: String,
    challenge: HeaderValue,
}

impl ApiKeyAuthenticator {
    /// Creates an authenticator, rejecting configurations that could never
    /// authenticate anyone.
    pub fn new<V>(config: ApiKeyConfig, validator: V) -> Result<Self, ApiKeyConfigError>
    where
        V: ApiKeyValidator + 'static,
    {
        Self::with_shared_validator(config, Arc::new(validator))
    }

    /// Creates an authenticator backed by a validator shared with other code.
    pub fn with_shared_validator(
        config: ApiKeyConfig,
        validator: Arc<dyn ApiKeyValidator>,
    ) -> Result<Self, ApiKeyConfigError> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(config),
            validator,
            events: Arc::new(DefaultApiKeyEvents),
            scheme_name: DEFAULT_SCHEME_NAME.to_string(),
            challenge: HeaderValue::from_static(DEFAULT_SCHEME_NAME),
        })
    }

    /// Sets the scheme name sent in challenges and recorded on users.
    ///
    /// The name must be a single token, since it may also be expected as the
    /// `Authorization` scheme.
    pub fn scheme_name(mut self, name: impl Into<String>) -> Result<Self, ApiKeyConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ApiKeyConfigError::EmptySchemeName);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ApiKeyConfigError::InvalidSchemeName { name });
        }
        self.challenge = HeaderValue::from_str(&name)
            .map_err(|_| ApiKeyConfigError::InvalidSchemeName { name: name.clone() })?;
        self.scheme_name = name;
        Ok(self)
    }

    /// Sets the object notified of successes and failures.
    pub fn events<E>(mut self, events: E) -> Self
    where
        E: ApiKeyAuthenticationEvents + 'static,
    {
        self.events = Arc::new(events);
        self
    }

    pub fn get_config(&self) -> &ApiKeyConfig {
        &self.config
    }

    pub fn get_scheme_name(&self) -> &str {
        &self.scheme_name
    }

    /// Decides the outcome for an already captured request.
    pub async fn authenticate_view(&self, view: &RequestView) -> AuthenticateResult<ApiKeyError> {
        let located = ApiKeyLocator::new(&self.config, &self.scheme_name).locate(view);

        let Some(located) = located else {
            if self.config.is_query_lookup_allowed() {
                tracing::debug!(scheme = %self.scheme_name, "no API key in request");
                return self.fail(ApiKeyError::MissingKey).await;
            }
            tracing::debug!(scheme = %self.scheme_name, "no API key in headers, abstaining");
            return AuthenticateResult::Abstain;
        };

        tracing::debug!(
            scheme = %self.scheme_name,
            source = ?located.source,
            name = %located.name,
            "API key located"
        );

        match self.validate(&located.value).await {
            Ok(Some(user)) => {
                let user = user.authenticated_by(self.scheme_name.clone());
                self.notify_success(&user).await;
                AuthenticateResult::Success(user)
            }
            Ok(None) => self.fail(ApiKeyError::InvalidKey).await,
            Err(err) => self.fail(err).await,
        }
    }

    /// Runs the validator once, folding errors and panics into a fault.
    async fn validate(&self, api_key: &str) -> Result<Option<User>, ApiKeyError> {
        match AssertUnwindSafe(self.validator.validate(api_key))
            .catch_unwind()
            .await
        {
            Ok(Ok(user)) => Ok(user),
            Ok(Err(err)) => {
                tracing::warn!(scheme = %self.scheme_name, error = %err, "API key validator failed");
                Err(ApiKeyError::validator_fault(err.to_string()))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(scheme = %self.scheme_name, panic = %message, "API key validator panicked");
                Err(ApiKeyError::validator_fault(message))
            }
        }
    }

    async fn fail(&self, err: ApiKeyError) -> AuthenticateResult<ApiKeyError> {
        let notified = AssertUnwindSafe(self.events.on_authentication_failed(&err))
            .catch_unwind()
            .await;
        if let Err(payload) = notified {
            tracing::warn!(
                scheme = %self.scheme_name,
                panic = %panic_message(payload.as_ref()),
                "authentication failure hook panicked"
            );
        }
        AuthenticateResult::Fail(err)
    }

    async fn notify_success(&self, user: &User) {
        let notified = AssertUnwindSafe(self.events.on_authentication_success(user))
            .catch_unwind()
            .await;
        if let Err(payload) = notified {
            tracing::warn!(
                scheme = %self.scheme_name,
                panic = %panic_message(payload.as_ref()),
                "authentication success hook panicked"
            );
        }
    }
}

impl Authenticator for ApiKeyAuthenticator {
    type Error = ApiKeyError;

    fn scheme_name(&self) -> &str {
        &self.scheme_name
    }

    fn authenticate(&self, req: &ServiceRequest) -> LocalBoxFuture<'static, AuthenticateResult<ApiKeyError>> {
        let view = RequestView::from_service_request(req);
        let this = self.clone();
        Box::pin(async move { this.authenticate_view(&view).await })
    }

    fn challenge(&self, headers: &mut HeaderMap) {
        headers.insert(WWW_AUTHENTICATE, self.challenge.clone());
    }
}

impl std::fmt::Debug for ApiKeyAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthenticator")
            .field("config", &self.config)
            .field("scheme_name", &self.scheme_name)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "API key validator panicked".to_string()
    }
}
