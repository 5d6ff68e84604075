//! In-memory API key store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::key::ApiKey;
use super::validator::{ApiKeyValidator, ValidatorError};
use crate::http::security::User;

/// In-memory [`ApiKeyValidator`] backed by [`ApiKey`] records.
///
/// Useful for development, testing, and simple applications. Disabled and
/// expired keys are rejected unless those checks are switched off.
///
/// # Example
///
/// ```
/// use actix_apikey_core::http::security::api_key::{ApiKey, InMemoryApiKeyRepository};
///
/// let repository = InMemoryApiKeyRepository::new()
///     .with_key(ApiKey::new("sk_live_abc123")
///         .name("Production Key")
///         .roles(vec!["API_USER".into()])
///         .authorities(vec!["api:read".into()]));
///
/// assert_eq!(repository.len(), 1);
/// ```
#[derive(Debug)]
pub struct InMemoryApiKeyRepository {
    keys: RwLock<HashMap<String, ApiKey>>,
    validate_expiration: bool,
    validate_enabled: bool,
}

impl Default for InMemoryApiKeyRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryApiKeyRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
            validate_expiration: true,
            validate_enabled: true,
        }
    }

    /// Adds an API key to the repository.
    pub fn with_key(self, key: ApiKey) -> Self {
        self.add_key(key);
        self
    }

    /// Sets whether expired keys are rejected.
    pub fn validate_expiration(mut self, validate: bool) -> Self {
        self.validate_expiration = validate;
        self
    }

    /// Sets whether disabled keys are rejected.
    pub fn validate_enabled(mut self, validate: bool) -> Self {
        self.validate_enabled = validate;
        self
    }

    /// Adds or replaces an API key.
    pub fn add_key(&self, key: ApiKey) {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        keys.insert(key.get_key().to_string(), key);
    }

    /// Removes an API key from the repository.
    pub fn remove_key(&self, key: &str) -> Option<ApiKey> {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        keys.remove(key)
    }

    /// Returns the number of keys in the repository.
    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds an API key by its value.
    pub fn find_by_key(&self, key: &str) -> Option<ApiKey> {
        let keys = self.keys.read().unwrap_or_else(PoisonError::into_inner);
        keys.get(key).cloned()
    }

    fn accepts(&self, key: &ApiKey) -> bool {
        if self.validate_enabled && !key.is_enabled() {
            tracing::debug!(name = ?key.get_name(), "API key is disabled");
            return false;
        }
        if self.validate_expiration && key.is_expired() {
            tracing::debug!(name = ?key.get_name(), "API key has expired");
            return false;
        }
        true
    }
}

#[async_trait]
impl ApiKeyValidator for InMemoryApiKeyRepository {
    async fn validate(&self, api_key: &str) -> Result<Option<User>, ValidatorError> {
        Ok(self
            .find_by_key(api_key)
            .filter(|key| self.accepts(key))
            .map(|key| key.to_user()))
    }
}
