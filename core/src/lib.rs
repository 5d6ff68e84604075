//! # Actix API Key
//!
//! API key authentication scheme for Actix Web.
//!
//! The scheme looks for a key in named request headers, in the `Authorization`
//! header under a scheme token, or in named query parameters, hands it to an
//! [`ApiKeyValidator`](http::security::api_key::ApiKeyValidator) and reports one
//! of three outcomes: success, failure, or abstain.
//!
//! ## Example
//!
//! ```rust,ignore
//! use actix_web::{get, App, HttpResponse, HttpServer, Responder};
//! use actix_apikey_core::http::security::api_key::{
//!     ApiKey, ApiKeyAuthenticator, ApiKeyConfig, InMemoryApiKeyRepository,
//! };
//! use actix_apikey_core::http::security::middleware::SecurityTransform;
//! use actix_apikey_core::http::security::AuthenticatedUser;
//!
//! #[get("/api/data")]
//! async fn data(user: AuthenticatedUser) -> impl Responder {
//!     HttpResponse::Ok().body(format!("Hello, {}!", user.get_username()))
//! }
//!
//! let repository = InMemoryApiKeyRepository::new()
//!     .with_key(ApiKey::new("sk_live_abc123").name("Service A"));
//!
//! // Fails fast on a self-contradictory configuration.
//! let authenticator = ApiKeyAuthenticator::new(ApiKeyConfig::new(), repository)?;
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .wrap(SecurityTransform::new(authenticator.clone()))
//!         .service(data)
//! })
//! ```
//!
//! ## Modules
//!
//! - [`http::security`] - Authentication scheme, middleware and extractors
//! - [`http::error`] - Error types

pub mod http;
