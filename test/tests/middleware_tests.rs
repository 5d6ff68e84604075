//! Middleware tests.
//!
//! How SecurityTransform turns outcomes into responses, plus validators and
//! event hooks plugged into a running service.


use std::sync::Arc;

use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::http::StatusCode;
use actix_web::test;
use async_trait::async_trait;

use actix_apikey_core::http::security::api_key::{
    ApiKeyAuthenticator, ApiKeyConfig, ApiKeyValidator, SimpleApiKeyValidator, ValidatorError,
};
use actix_apikey_core::http::security::{
    AuditLogger, InMemoryEventStore, SecurityEventType, User,
};
use common::{create_test_app, test_authenticator, test_repository, VALID_KEY};

struct OfflineValidator;

#[async_trait]
impl ApiKeyValidator for OfflineValidator {
    async fn validate(&self, _api_key: &str) -> Result<Option<User>, ValidatorError> {
        Err(ValidatorError::Unavailable {
            message: "connection to 10.0.0.5 refused".into(),
        })
    }
}

// =============================================================================
// Abstain Handling
// =============================================================================

#[actix_web::test]
async fn test_abstain_reaches_handler_without_user() {
    let authenticator = test_authenticator(ApiKeyConfig::new().allow_query_lookup(false));
    let app = create_test_app(authenticator, false).await;

    // The extractor, not the middleware, rejects the anonymous caller.
    let req = test::TestRequest::get().uri("/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(WWW_AUTHENTICATE).is_none());
}

#[actix_web::test]
async fn test_required_authentication_challenges_on_abstain() {
    let authenticator = test_authenticator(ApiKeyConfig::new().allow_query_lookup(false));
    let app = create_test_app(authenticator, true).await;

    let req = test::TestRequest::get().uri("/greeting").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(WWW_AUTHENTICATE).unwrap(), "ApiKey");

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Authentication required");

    let req = test::TestRequest::get()
        .uri("/greeting")
        .insert_header(("X-API-KEY", VALID_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// =============================================================================
// Challenge
// =============================================================================

#[actix_web::test]
async fn test_challenge_carries_custom_scheme_name() {
    let authenticator = test_authenticator(ApiKeyConfig::new())
        .scheme_name("ServiceKey")
        .unwrap();
    let app = create_test_app(authenticator, false).await;

    let req = test::TestRequest::get().uri("/greeting").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(WWW_AUTHENTICATE).unwrap(), "ServiceKey");

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("X-API-KEY", VALID_KEY))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["scheme"], "ServiceKey");
}

// =============================================================================
// Validators
// =============================================================================

#[actix_web::test]
async fn test_validator_fault_is_not_exposed() {
    let authenticator = ApiKeyAuthenticator::new(ApiKeyConfig::new(), OfflineValidator).unwrap();
    let app = create_test_app(authenticator, false).await;

    let req = test::TestRequest::get()
        .uri("/greeting")
        .insert_header(("X-API-KEY", VALID_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("API key could not be verified"));
    assert!(!body.contains("10.0.0.5"));
}

#[actix_web::test]
async fn test_simple_validator() {
    let validator = SimpleApiKeyValidator::new(|key: &str| key.starts_with("sk_"))
        .principal_name("partner");
    let authenticator = ApiKeyAuthenticator::new(ApiKeyConfig::new(), validator).unwrap();
    let app = create_test_app(authenticator, false).await;

    let req = test::TestRequest::get()
        .uri("/whoami?apikey=sk_anything")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], "partner");
}

#[actix_web::test]
async fn test_shared_repository() {
    let repository = Arc::new(test_repository());
    let authenticator =
        ApiKeyAuthenticator::with_shared_validator(ApiKeyConfig::new(), repository.clone())
            .unwrap();
    let app = create_test_app(authenticator, false).await;

    repository.remove_key(VALID_KEY);

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("X-API-KEY", VALID_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Events and Configuration
// =============================================================================

#[actix_web::test]
async fn test_audit_events_follow_outcomes() {
    let store = InMemoryEventStore::new();
    let authenticator = test_authenticator(ApiKeyConfig::new().allow_query_lookup(false))
        .events(AuditLogger::new().add_handler(store.clone()));
    let app = create_test_app(authenticator, false).await;

    for key in [Some(VALID_KEY), Some("wrong"), None] {
        let mut req = test::TestRequest::get().uri("/greeting");
        if let Some(key) = key {
            req = req.insert_header(("X-API-KEY", key));
        }
        test::call_service(&app, req.to_request()).await;
    }

    let successes = store.get_events_by_type(&SecurityEventType::AuthenticationSuccess);
    let failures = store.get_events_by_type(&SecurityEventType::AuthenticationFailure);
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].username.as_deref(), Some("Test Client"));
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].error.as_deref(), Some("Invalid api key"));
    // Abstaining is not an event.
    assert_eq!(store.get_events().len(), 2);
}

#[actix_web::test]
async fn test_configuration_from_json() {
    let config: ApiKeyConfig = serde_json::from_str(
        r#"{
            "allow_query_lookup": false,
            "header_keys": [{ "name": "x-partner-key", "case_sensitive": true }]
        }"#,
    )
    .unwrap();
    let app = create_test_app(test_authenticator(config), false).await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("X-Partner-Key", VALID_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_self_contradictory_configuration_is_rejected() {
    let config = ApiKeyConfig::new()
        .allow_header_lookup(false)
        .allow_query_lookup(false);
    assert!(ApiKeyAuthenticator::new(config, test_repository()).is_err());
}
