//! API routes (a valid key is required).

use actix_web::{get, HttpResponse, Responder};
use serde::Serialize;

use actix_apikey_core::http::security::AuthenticatedUser;

#[derive(Serialize)]
struct Principal<'a> {
    username: &'a str,
    scheme: &'a str,
    roles: &'a [String],
    authorities: &'a [String],
}

/// Describes the caller the key belongs to.
#[get("/whoami")]
pub async fn whoami(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(Principal {
        username: user.get_username(),
        scheme: user.scheme(),
        roles: user.get_roles(),
        authorities: user.get_authorities(),
    })
}

#[get("/reports")]
pub async fn reports(user: AuthenticatedUser) -> impl Responder {
    if !user.has_authority("reports:read") {
        return HttpResponse::Forbidden().body("reports:read authority required");
    }
    HttpResponse::Ok()
        .content_type("application/json")
        .body(format!(
            r#"{{"message": "Monthly report", "requestedBy": "{}"}}"#,
            user.get_username()
        ))
}
