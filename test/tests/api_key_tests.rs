//! API key scheme tests.
//!
//! Where keys are looked up, in what order, and what each request resolves
//! to, exercised through a real Actix service.


use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::http::StatusCode;
use actix_web::test;

use actix_apikey_core::http::security::api_key::{
    ApiKeyAuthenticator, ApiKeyConfig, ApiKeyConfigError, KeyName,
};
use common::{create_app_with, test_authenticator, test_repository, VALID_KEY};

// =============================================================================
// Header Lookup
// =============================================================================

#[actix_web::test]
async fn test_default_header_authenticates() {
    let app = create_app_with(ApiKeyConfig::new()).await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("X-API-KEY", VALID_KEY))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "Test Client");
    assert_eq!(body["scheme"], "ApiKey");
}

#[actix_web::test]
async fn test_custom_header_authenticates() {
    let config = ApiKeyConfig::new().header_keys(vec![KeyName::new("ApiKey")]);
    let app = create_app_with(config).await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("ApiKey", VALID_KEY))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_unlisted_header_is_missing_key() {
    let config = ApiKeyConfig::new()
        .header_keys(vec![KeyName::new("ApiKey"), KeyName::new("XApiKey")]);
    let app = create_app_with(config).await;

    let req = test::TestRequest::get()
        .uri("/greeting")
        .insert_header(("mykey", VALID_KEY))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Missing api key");
}

#[actix_web::test]
async fn test_header_name_case_rules() {
    let insensitive = create_app_with(
        ApiKeyConfig::new().header_keys(vec![KeyName::with_case("ApiKey", false)]),
    )
    .await;
    let sensitive = create_app_with(
        ApiKeyConfig::new()
            .allow_query_lookup(false)
            .header_keys(vec![KeyName::with_case("apikey", true)]),
    )
    .await;

    let req = |name: &'static str| {
        test::TestRequest::get()
            .uri("/whoami")
            .insert_header((name, VALID_KEY))
            .to_request()
    };

    let resp = test::call_service(&insensitive, req("APIKEY")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&sensitive, req("apikey")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_uppercase_case_sensitive_header_is_rejected() {
    let config = ApiKeyConfig::new()
        .allow_query_lookup(false)
        .header_keys(vec![KeyName::with_case("ApiKey", true)]);

    let err = ApiKeyAuthenticator::new(config, test_repository()).unwrap_err();
    assert_eq!(
        err,
        ApiKeyConfigError::UnmatchableHeaderKey {
            name: "ApiKey".into()
        }
    );
}

#[actix_web::test]
async fn test_invalid_and_disabled_keys_are_rejected() {
    let app = create_app_with(ApiKeyConfig::new()).await;

    for key in ["wrong", "disabled-key"] {
        let req = test::TestRequest::get()
            .uri("/greeting")
            .insert_header(("X-API-KEY", key))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(WWW_AUTHENTICATE).unwrap(), "ApiKey");

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid api key");
    }
}

// =============================================================================
// Authorization Header
// =============================================================================

#[actix_web::test]
async fn test_bearer_authorization_authenticates() {
    let app = create_app_with(ApiKeyConfig::new().use_authorization_header(true)).await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", format!("Bearer {VALID_KEY}")))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_authorization_scheme_mismatch_fails() {
    let config = ApiKeyConfig::new()
        .use_authorization_header(true)
        .authorization_scheme("ApiKey");
    let app = create_app_with(config).await;

    let req = test::TestRequest::get()
        .uri("/greeting")
        .insert_header(("Authorization", format!("Bearer {VALID_KEY}")))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_scheme_name_token_with_custom_name() {
    let config = ApiKeyConfig::new()
        .use_authorization_header(true)
        .use_scheme_name_as_token(true);
    assert!(test_authenticator(config.clone()).scheme_name("Api Key").is_err());

    let authenticator = test_authenticator(config).scheme_name("PartnerKey").unwrap();
    let app = common::create_test_app(authenticator, false).await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", format!("PartnerKey {VALID_KEY}")))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_authorization_token_from_scheme_name() {
    let config = ApiKeyConfig::new()
        .use_authorization_header(true)
        .use_scheme_name_as_token(true);
    let app = create_app_with(config).await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", format!("apikey {VALID_KEY}")))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// =============================================================================
// Query Lookup
// =============================================================================

#[actix_web::test]
async fn test_query_key_ignores_case() {
    let app = create_app_with(ApiKeyConfig::new().query_keys(vec![KeyName::new("mykey")])).await;

    let req = test::TestRequest::get()
        .uri(&format!("/whoami?MYKEY={VALID_KEY}"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_first_declared_query_key_wins() {
    let config = ApiKeyConfig::new()
        .query_keys(vec![KeyName::new("primary"), KeyName::new("fallback")]);
    let app = create_app_with(config).await;

    // The first declared name carries a bad key, so the good one is never tried.
    let req = test::TestRequest::get()
        .uri(&format!("/greeting?fallback={VALID_KEY}&primary=wrong"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_header_takes_priority_over_query() {
    let app = create_app_with(ApiKeyConfig::new()).await;

    let req = test::TestRequest::get()
        .uri("/greeting?apikey=wrong")
        .insert_header(("X-API-KEY", VALID_KEY))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert_eq!(String::from_utf8_lossy(&body), "Hello, Test Client!");
}

// =============================================================================
// Missing Keys
// =============================================================================

#[actix_web::test]
async fn test_query_lookup_without_key_fails() {
    let app = create_app_with(ApiKeyConfig::new().allow_header_lookup(false)).await;

    let req = test::TestRequest::get()
        .uri("/greeting")
        .insert_header(("X-API-KEY", VALID_KEY))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(WWW_AUTHENTICATE).unwrap(), "ApiKey");
}

#[actix_web::test]
async fn test_header_only_without_key_abstains() {
    let app = create_app_with(ApiKeyConfig::new().allow_query_lookup(false)).await;

    let req = test::TestRequest::get().uri("/greeting").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(WWW_AUTHENTICATE).is_none());

    let body = test::read_body(resp).await;
    assert_eq!(String::from_utf8_lossy(&body), "Hello, guest!");
}

#[actix_web::test]
async fn test_repeated_requests_resolve_the_same() {
    let app = create_app_with(ApiKeyConfig::new()).await;

    for _ in 0..3 {
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("X-API-KEY", VALID_KEY))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("X-API-KEY", "wrong"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
