//! API Key authentication error types.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::{Display, Error};

/// Why an API key authentication attempt failed.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ApiKeyError {
    /// Query lookup was enabled and no configured location carried a key.
    #[display("Missing api key")]
    MissingKey,

    /// A key was found but the validator rejected it.
    #[display("Invalid api key")]
    InvalidKey,

    /// The `Authorization` header is not `<scheme> <parameter>`.
    #[display("Malformed authorization header")]
    MalformedHeader,

    /// The validator failed unexpectedly.
    #[display("{message}")]
    ValidatorFault { message: String },
}

impl ApiKeyError {
    pub(crate) fn validator_fault(message: impl Into<String>) -> Self {
        ApiKeyError::ValidatorFault {
            message: message.into(),
        }
    }

    /// Stable, machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiKeyError::MissingKey => "missing_key",
            ApiKeyError::InvalidKey => "invalid_key",
            ApiKeyError::MalformedHeader => "malformed_header",
            ApiKeyError::ValidatorFault { .. } => "validator_fault",
        }
    }

    /// The message sent to clients. Validator faults are reported generically.
    pub fn public_message(&self) -> String {
        match self {
            ApiKeyError::ValidatorFault { .. } => "API key could not be verified".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiKeyError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error = status.canonical_reason().unwrap_or("Error");

        HttpResponse::build(status).json(serde_json::json!({
            "error": error,
            "message": self.public_message(),
        }))
    }
}
