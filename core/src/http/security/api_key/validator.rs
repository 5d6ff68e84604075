//! Validator contract between the authentication scheme and a key store.

use std::sync::Arc;

use async_trait::async_trait;
use derive_more::{Display, Error};

use crate::http::security::User;

/// Name given to principals produced by [`SimpleApiKeyValidator`] by default.
pub const DEFAULT_PRINCIPAL_NAME: &str = "api-key-client";

/// Unexpected failures of a validator. A rejected key is not an error.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    /// The backing store could not be reached.
    #[display("API key store unavailable: {message}")]
    Unavailable { message: String },

    /// Any other failure.
    #[display("API key validation failed: {message}")]
    Other { message: String },
}

/// Maps a candidate key to a principal.
///
/// Called at most once per request, only when a key was found. Retries and
/// timeouts are up to the implementation.
///
/// Returns `Ok(Some(user))` for a valid key, `Ok(None)` for an invalid one and
/// `Err(..)` when the key could not be checked.
///
/// # Example
///
/// ```rust,ignore
/// use actix_apikey_core::http::security::api_key::{ApiKeyValidator, ValidatorError};
/// use actix_apikey_core::http::security::User;
/// use async_trait::async_trait;
///
/// struct DatabaseValidator {
///     pool: PgPool,
/// }
///
/// #[async_trait]
/// impl ApiKeyValidator for DatabaseValidator {
///     async fn validate(&self, api_key: &str) -> Result<Option<User>, ValidatorError> {
///         let row = sqlx::query!("SELECT owner FROM api_keys WHERE hash = $1", hash(api_key))
///             .fetch_optional(&self.pool)
///             .await
///             .map_err(|e| ValidatorError::Unavailable { message: e.to_string() })?;
///         Ok(row.map(|r| User::new(r.owner)))
///     }
/// }
/// ```
#[async_trait]
pub trait ApiKeyValidator: Send + Sync {
    async fn validate(&self, api_key: &str) -> Result<Option<User>, ValidatorError>;
}

#[async_trait]
impl<V: ApiKeyValidator + ?Sized> ApiKeyValidator for Arc<V> {
    async fn validate(&self, api_key: &str) -> Result<Option<User>, ValidatorError> {
        (**self).validate(api_key).await
    }
}

/// Validator that only answers "valid or not".
///
/// Every accepted key maps to the same principal name.
///
/// # Example
///
/// ```
/// use actix_apikey_core::http::security::api_key::SimpleApiKeyValidator;
///
/// let validator = SimpleApiKeyValidator::new(|key| key == "sk_test_123")
///     .principal_name("internal");
/// ```
pub struct SimpleApiKeyValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    predicate: F,
    principal_name: String,
}

impl<F> SimpleApiKeyValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            principal_name: DEFAULT_PRINCIPAL_NAME.to_string(),
        }
    }

    /// Sets the username of the principals this validator produces.
    pub fn principal_name(mut self, name: impl Into<String>) -> Self {
        self.principal_name = name.into();
        self
    }
}

#[async_trait]
impl<F> ApiKeyValidator for SimpleApiKeyValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    async fn validate(&self, api_key: &str) -> Result<Option<User>, ValidatorError> {
        Ok((self.predicate)(api_key).then(|| User::new(self.principal_name.clone())))
    }
}
