use actix_web::{error, http::StatusCode, HttpResponse};
use derive_more::{Display, Error};

/// Raised when a route needs an authenticated user and no scheme produced one.
///
/// Renders the same JSON shape as scheme failures, so clients see one error
/// format whether the key was wrong or absent.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[display("Authentication required")]
    Unauthorized,
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        }))
    }
}
