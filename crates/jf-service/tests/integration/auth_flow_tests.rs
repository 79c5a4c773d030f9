//! E2E tests for the credentialed authentication flow.
//!
//! Drives the full router (middleware + filter + resolvers) over in-memory
//! stores; the echo upstream reports the headers and extensions the filter
//! forwarded.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use axum::body::Body;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use jf_test_utils::{
    json_body, test_consumer, test_hs256_secret, FilterHarness, TestTokenBuilder,
    ECHO_HAS_CONSUMER, ECHO_HAS_CREDENTIAL, ECHO_HAS_TOKEN, TEST_CONSUMER_ALICE, TEST_ISSUER_A,
};
use jf_service::config::FilterConfig;
use jf_service::models::Consumer;

fn harness() -> FilterHarness {
    FilterHarness::builder()
        .with_secret(test_hs256_secret(TEST_ISSUER_A, TEST_CONSUMER_ALICE))
        .with_consumer(test_consumer(TEST_CONSUMER_ALICE, "alice"))
        .build()
}

#[tokio::test]
async fn test_valid_token_reaches_upstream_with_identity_headers() -> Result<(), anyhow::Error> {
    let harness = harness();
    let token = TestTokenBuilder::new().mint();

    let response = harness.get_with_bearer("/echo", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["x-consumer-id"].as_str(),
        Some(TEST_CONSUMER_ALICE.to_string().as_str())
    );
    assert_eq!(body["x-consumer-username"].as_str(), Some("alice"));
    assert!(
        body.get("x-anonymous-consumer").is_none(),
        "credentialed requests must not carry the anonymous marker"
    );

    Ok(())
}

#[tokio::test]
async fn test_valid_token_attaches_identity_extensions() {
    let harness = harness();
    let token = TestTokenBuilder::new().mint();

    let body = json_body(harness.get_with_bearer("/echo", &token).await).await;

    assert_eq!(body[ECHO_HAS_CREDENTIAL], true);
    assert_eq!(body[ECHO_HAS_CONSUMER], true);
    assert_eq!(body[ECHO_HAS_TOKEN], true);
}

#[tokio::test]
async fn test_absent_consumer_fields_are_not_forwarded() {
    let consumer = Consumer {
        custom_id: None,
        ..test_consumer(TEST_CONSUMER_ALICE, "alice")
    };
    let harness = FilterHarness::builder()
        .with_secret(test_hs256_secret(TEST_ISSUER_A, TEST_CONSUMER_ALICE))
        .with_consumer(consumer)
        .build();

    let body = json_body(
        harness
            .get_with_bearer("/echo", &TestTokenBuilder::new().mint())
            .await,
    )
    .await;

    assert!(body.get("x-consumer-custom-id").is_none());
}

#[tokio::test]
async fn test_spoofed_identity_headers_are_stripped() -> Result<(), anyhow::Error> {
    let harness = harness();
    let token = TestTokenBuilder::new().mint();

    let request = Request::builder()
        .uri("/echo")
        .header("authorization", format!("Bearer {token}"))
        .header("x-consumer-id", "spoofed-id")
        .header("x-consumer-username", "mallory")
        .header("x-anonymous-consumer", "true")
        .body(Body::empty())?;
    let body = json_body(harness.oneshot(request).await).await;

    // The filter's resolved identity wins over everything inbound
    assert_eq!(
        body["x-consumer-id"].as_str(),
        Some(TEST_CONSUMER_ALICE.to_string().as_str())
    );
    assert_eq!(body["x-consumer-username"].as_str(), Some("alice"));
    assert!(body.get("x-anonymous-consumer").is_none());

    Ok(())
}

#[tokio::test]
async fn test_decision_is_idempotent_across_identical_requests() {
    let harness = harness();
    let token = TestTokenBuilder::new().mint();

    let first = json_body(harness.get_with_bearer("/echo", &token).await).await;
    let second = json_body(harness.get_with_bearer("/echo", &token).await).await;

    assert_eq!(first["x-consumer-id"], second["x-consumer-id"]);
    assert_eq!(first["x-consumer-username"], second["x-consumer-username"]);
}

#[tokio::test]
async fn test_preflight_passes_through_when_disabled() {
    let harness = FilterHarness::builder()
        .with_config(FilterConfig {
            run_on_preflight: false,
            ..FilterConfig::default()
        })
        .build();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/echo")
        .body(Body::empty())
        .expect("request builds");
    let response = harness.oneshot(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body[ECHO_HAS_CONSUMER], false, "pass-through sets no identity");
}

#[tokio::test]
async fn test_preflight_authenticated_by_default() {
    let harness = harness();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/echo")
        .body(Body::empty())
        .expect("request builds");
    let response = harness.oneshot(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_endpoint_needs_no_credentials() {
    let harness = harness();

    let response = harness.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
}
