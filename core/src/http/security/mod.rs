//! Security module providing API key authentication.
//!
//! # Spring Equivalent
//! `org.springframework.security` package
//!
//! # Module Structure
//!
//! - `api_key` - API key scheme (configuration, locator, decision engine, validators)
//! - `config` - Core contract (Authenticator, AuthenticateResult)
//! - `middleware` - Security middleware (SecurityTransform)
//! - `extractor` - Actix Web extractors (AuthenticatedUser, OptionalUser)
//! - `user` - User model
//! - `audit` - Security audit logging

// Re-exports for convenience
pub use audit::{
    AuditLogger, InMemoryEventStore, SecurityEvent, SecurityEventHandler, SecurityEventSeverity,
    SecurityEventType, TracingHandler,
};
pub use config::{AuthenticateResult, Authenticator};
pub use extractor::{AuthenticatedUser, OptionalUser, SecurityExt};
pub use middleware::SecurityTransform;
pub use user::User;

// Internal modules (private implementation details)
mod config;
mod extractor;
mod user;

// Public modules
pub mod api_key;
pub mod audit;
pub mod middleware;
