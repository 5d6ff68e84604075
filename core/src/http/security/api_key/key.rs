//! API Key record held by [`InMemoryApiKeyRepository`](super::InMemoryApiKeyRepository).

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use crate::http::security::User;

/// Claim carrying the key owner on principals built from an [`ApiKey`].
pub const OWNER_CLAIM: &str = "owner";

/// An API key with the identity it grants.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use actix_apikey_core::http::security::api_key::ApiKey;
///
/// let key = ApiKey::new("sk_live_abc123")
///     .name("Production API Key")
///     .owner("service-account@example.com")
///     .roles(vec!["API_USER".into()])
///     .authorities(vec!["api:read".into(), "api:write".into()])
///     .expires_in(Duration::from_secs(86400 * 365));
///
/// assert!(key.is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct ApiKey {
    key: String,
    name: Option<String>,
    owner: Option<String>,
    roles: Vec<String>,
    authorities: Vec<String>,
    enabled: bool,
    expires_at: Option<SystemTime>,
    metadata: BTreeMap<String, String>,
}

impl ApiKey {
    /// Creates an enabled, non-expiring key with the given value.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            owner: None,
            roles: Vec::new(),
            authorities: Vec::new(),
            enabled: true,
            expires_at: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Sets the human-readable name, used as the principal's username.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    pub fn authorities(mut self, authorities: Vec<String>) -> Self {
        self.authorities = authorities;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn expires_at(mut self, expires_at: SystemTime) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets expiration relative to now.
    pub fn expires_in(mut self, duration: Duration) -> Self {
        self.expires_at = Some(SystemTime::now() + duration);
        self
    }

    /// Adds metadata, copied into the principal's claims.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn get_key(&self) -> &str {
        &self.key
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn get_owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| SystemTime::now() > expires_at)
    }

    /// Enabled and not expired.
    pub fn is_valid(&self) -> bool {
        self.enabled && !self.is_expired()
    }

    /// Builds the principal this key grants.
    ///
    /// The username is the key's name; unnamed keys fall back to the owner,
    /// then to a fixed label so the secret never becomes an identifier.
    pub fn to_user(&self) -> User {
        let username = self
            .name
            .as_deref()
            .or(self.owner.as_deref())
            .unwrap_or("unnamed-api-key");

        let mut user = User::new(username)
            .roles(&self.roles)
            .authorities(&self.authorities);
        if let Some(owner) = &self.owner {
            user = user.claim(OWNER_CLAIM, owner.clone());
        }
        for (name, value) in &self.metadata {
            user = user.claim(name.clone(), value.clone());
        }
        user
    }
}
