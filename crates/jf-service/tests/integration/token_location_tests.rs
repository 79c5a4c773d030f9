//! E2E tests for token source precedence.
//!
//! The locator's unit tests cover the parsing details; these verify the
//! precedence rules and multiplicity errors on the wire.

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use jf_test_utils::{
    json_body, test_consumer, test_hs256_secret, FilterHarness, TestTokenBuilder,
    TEST_CONSUMER_ALICE, TEST_CONSUMER_BOB, TEST_ISSUER_A, TEST_ISSUER_B,
};
use jf_service::config::FilterConfig;

fn two_issuer_harness(config: FilterConfig) -> FilterHarness {
    FilterHarness::builder()
        .with_config(config)
        .with_secret(test_hs256_secret(TEST_ISSUER_A, TEST_CONSUMER_ALICE))
        .with_secret(test_hs256_secret(TEST_ISSUER_B, TEST_CONSUMER_BOB))
        .with_consumer(test_consumer(TEST_CONSUMER_ALICE, "alice"))
        .with_consumer(test_consumer(TEST_CONSUMER_BOB, "bob"))
        .build()
}

#[tokio::test]
async fn test_uri_param_chosen_over_cookie_and_header() {
    let harness = two_issuer_harness(FilterConfig {
        cookie_names: vec!["session_jwt".to_string()],
        ..FilterConfig::default()
    });
    let query_token = TestTokenBuilder::new().issued_by(TEST_ISSUER_A).mint();
    let header_token = TestTokenBuilder::new().issued_by(TEST_ISSUER_B).mint();

    let request = Request::builder()
        .uri(format!("/echo?jwt={query_token}"))
        .header("cookie", format!("session_jwt={header_token}"))
        .header("authorization", format!("Bearer {header_token}"))
        .body(Body::empty())
        .expect("request builds");
    let response = harness.oneshot(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["x-consumer-username"].as_str(),
        Some("alice"),
        "the query-parameter token must win"
    );
}

#[tokio::test]
async fn test_cookie_chosen_over_authorization_header() {
    let harness = two_issuer_harness(FilterConfig {
        cookie_names: vec!["session_jwt".to_string()],
        ..FilterConfig::default()
    });
    let cookie_token = TestTokenBuilder::new().issued_by(TEST_ISSUER_A).mint();
    let header_token = TestTokenBuilder::new().issued_by(TEST_ISSUER_B).mint();

    let request = Request::builder()
        .uri("/echo")
        .header("cookie", format!("session_jwt={cookie_token}"))
        .header("authorization", format!("Bearer {header_token}"))
        .body(Body::empty())
        .expect("request builds");
    let body = json_body(harness.oneshot(request).await).await;

    assert_eq!(body["x-consumer-username"].as_str(), Some("alice"));
}

#[tokio::test]
async fn test_two_uri_params_rejected_as_multiple_tokens() {
    let harness = two_issuer_harness(FilterConfig {
        uri_param_names: vec!["jwt".to_string(), "token".to_string()],
        ..FilterConfig::default()
    });
    let token = TestTokenBuilder::new().mint();

    let response = harness
        .get(&format!("/echo?jwt={token}&token={token}"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"].as_str(), Some("MULTIPLE_TOKENS"));
    assert_eq!(
        body["error"]["message"].as_str(),
        Some("Multiple tokens provided")
    );
}

#[tokio::test]
async fn test_bearer_scheme_case_insensitive_on_the_wire() {
    let harness = two_issuer_harness(FilterConfig::default());
    let token = TestTokenBuilder::new().mint();

    let request = Request::builder()
        .uri("/echo")
        .header("authorization", format!("bEaReR {token}"))
        .body(Body::empty())
        .expect("request builds");
    let response = harness.oneshot(request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_no_token_rejected_401() {
    let harness = two_issuer_harness(FilterConfig::default());

    let response = harness.get("/echo").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"].as_str(), Some("NO_TOKEN"));
    assert_eq!(body["error"]["message"].as_str(), Some("Unauthorized"));
}
