//! Authentication event hooks.

use async_trait::async_trait;

use super::error::ApiKeyError;
use crate::http::security::User;

/// Side-channel notified of terminal API key outcomes.
///
/// Exactly one hook runs per `Success` or `Fail`, before the outcome is
/// handed back to the pipeline. Nothing runs on `Abstain`. Hooks cannot alter
/// the outcome; a panicking hook is logged and ignored.
///
/// Both methods default to doing nothing, so implementors override only what
/// they need.
///
/// # Example
///
/// ```ignore
/// use actix_apikey_core::http::security::api_key::{ApiKeyAuthenticationEvents, ApiKeyError};
/// use async_trait::async_trait;
///
/// struct FailureCounter(AtomicUsize);
///
/// #[async_trait]
/// impl ApiKeyAuthenticationEvents for FailureCounter {
///     async fn on_authentication_failed(&self, _error: &ApiKeyError) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
#[async_trait]
pub trait ApiKeyAuthenticationEvents: Send + Sync {
    /// Called after the validator accepted a key.
    async fn on_authentication_success(&self, _user: &User) {}

    /// Called when the scheme fails the request.
    async fn on_authentication_failed(&self, _error: &ApiKeyError) {}
}

/// Events object that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultApiKeyEvents;

impl ApiKeyAuthenticationEvents for DefaultApiKeyEvents {}
