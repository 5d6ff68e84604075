//! Public routes (the scheme may abstain).

use actix_web::{get, HttpRequest, HttpResponse, Responder};

use actix_apikey_core::http::security::{OptionalUser, SecurityExt};

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Greets callers with or without a key. Uses OptionalUser (never fails).
#[get("/")]
pub async fn index(req: HttpRequest, user: OptionalUser) -> impl Responder {
    match (user.into_inner(), req.get_authentication_scheme()) {
        (Some(u), scheme) => HttpResponse::Ok().body(format!(
            "Hello, {}!\nRoles: {:?}\nAuthenticated via: {}",
            u.get_username(),
            u.get_roles(),
            scheme.as_deref().unwrap_or("unknown")
        )),
        (None, _) => HttpResponse::Ok().body("Hello, guest! Send X-API-KEY to identify yourself."),
    }
}
