//! API Key Authentication for Actix Web.
//!
//! # Overview
//!
//! Clients authenticate by sending a pre-shared key. The scheme looks for the
//! key, asks an [`ApiKeyValidator`] who it belongs to and answers with one of
//! three outcomes: success, failure, or abstain (nothing to judge, so another
//! scheme may try).
//!
//! # Key Locations
//!
//! Locations are tried in this order; the first hit wins:
//! 1. **Headers**: each declared name in order (`X-API-KEY` by default), or
//!    the `Authorization` header when configured
//!    (`Authorization: Bearer your-api-key`).
//! 2. **Query parameters**: each declared name in order (`apikey` by default).
//!
//! Every name carries its own case rule.
//!
//! # Missing keys
//!
//! When no key is found the outcome depends on what is enabled: with query
//! lookup on, the request fails with "Missing api key"; with header lookup
//! only, the scheme abstains.
//!
//! # Usage
//!
//! ```ignore
//! use actix_apikey_core::http::security::api_key::{
//!     ApiKey, ApiKeyAuthenticator, ApiKeyConfig, InMemoryApiKeyRepository,
//! };
//! use actix_apikey_core::http::security::middleware::SecurityTransform;
//!
//! let repository = InMemoryApiKeyRepository::new()
//!     .with_key(ApiKey::new("sk_live_abc123")
//!         .name("Production Key")
//!         .roles(vec!["API_USER".into()])
//!         .authorities(vec!["api:read".into(), "api:write".into()]));
//!
//! let config = ApiKeyConfig::new()
//!     .allow_query_lookup(false)
//!     .use_authorization_header(true)
//!     .authorization_scheme("ApiKey"); // Authorization: ApiKey sk_xxx
//!
//! let authenticator = ApiKeyAuthenticator::new(config, repository)?;
//!
//! App::new()
//!     .wrap(SecurityTransform::new(authenticator.clone()))
//!     .service(my_api_endpoint)
//! ```
//!
//! # Spring Security Comparison
//!
//! | Spring Security | Actix Security |
//! |-----------------|----------------|
//! | Custom `AuthenticationFilter` | `ApiKeyAuthenticator` |
//! | `AuthenticationProvider` | `ApiKeyValidator` |
//! | `AuthenticationEventPublisher` | `ApiKeyAuthenticationEvents` |
//!
//! # Security Considerations
//!
//! Keys travel in plaintext, so serve them over HTTPS only. Query parameters
//! end up in access logs; prefer headers. The scheme never logs key values.

mod authenticator;
mod config;
mod error;
mod events;
mod key;
mod locator;
mod repository;
mod request;
mod validator;

pub use authenticator::{ApiKeyAuthenticator, DEFAULT_SCHEME_NAME};
pub use config::{
    ApiKeyConfig, ApiKeyConfigError, KeyName, KeyNames, DEFAULT_AUTHORIZATION_SCHEME,
    DEFAULT_HEADER_KEY, DEFAULT_QUERY_KEY,
};
pub use error::ApiKeyError;
pub use events::{ApiKeyAuthenticationEvents, DefaultApiKeyEvents};
pub use key::{ApiKey, OWNER_CLAIM};
pub use locator::{parse_authorization, ApiKeyLocator, KeySource, LocatedKey};
pub use repository::InMemoryApiKeyRepository;
pub use request::RequestView;
pub use validator::{ApiKeyValidator, SimpleApiKeyValidator, ValidatorError, DEFAULT_PRINCIPAL_NAME};
