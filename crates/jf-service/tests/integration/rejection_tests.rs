//! E2E tests for rejection classification on the wire.
//!
//! One test per taxonomy class; the exact status/message pairing is the
//! externally observable contract of the filter.

use axum::http::StatusCode;
use jf_test_utils::{
    json_body, test_consumer, test_hs256_secret, FilterHarness, TestTokenBuilder,
    TEST_CONSUMER_ALICE, TEST_ISSUER_A,
};
use jsonwebtoken::Algorithm;
use serde_json::json;

fn harness() -> FilterHarness {
    FilterHarness::builder()
        .with_secret(test_hs256_secret(TEST_ISSUER_A, TEST_CONSUMER_ALICE))
        .with_consumer(test_consumer(TEST_CONSUMER_ALICE, "alice"))
        .build()
}

#[tokio::test]
async fn test_garbage_token_is_401_unrecognizable() {
    let harness = harness();

    let response = harness.get_with_bearer("/echo", "not-a-jwt-at-all").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"].as_str(), Some("UNRECOGNIZABLE_TOKEN"));
}

#[tokio::test]
async fn test_undecodable_segments_are_401_bad_token() {
    let harness = harness();

    let response = harness.get_with_bearer("/echo", "!!!.???.###").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"].as_str(), Some("BAD_TOKEN"));
    assert_eq!(body["error"]["message"].as_str(), Some("Bad token"));
}

#[tokio::test]
async fn test_missing_key_claim_is_401_and_names_the_claim() {
    let harness = harness();
    let token = TestTokenBuilder::new().without_claim("iss").mint();

    let response = harness.get_with_bearer("/echo", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(
        body["error"]["message"].as_str(),
        Some("No mandatory 'iss' in claims")
    );
}

#[tokio::test]
async fn test_unknown_issuer_is_403_no_credentials() {
    let harness = harness();
    let token = TestTokenBuilder::new().issued_by("nobody-home").mint();

    let response = harness.get_with_bearer("/echo", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"].as_str(), Some("NO_CREDENTIALS_FOUND"));
    assert_eq!(
        body["error"]["message"].as_str(),
        Some("No credentials found for given 'iss'")
    );
}

#[tokio::test]
async fn test_algorithm_mismatch_is_403_regardless_of_signature() {
    let harness = harness();
    // Correctly signed, but with HS384 while the stored record pins HS256
    let token = TestTokenBuilder::new()
        .with_algorithm(Algorithm::HS384)
        .mint();

    let response = harness.get_with_bearer("/echo", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"].as_str(), Some("INVALID_ALGORITHM"));
}

#[tokio::test]
async fn test_expired_token_is_401_with_claim_detail() {
    let harness = harness();
    let token = TestTokenBuilder::new().expires_in(-60).mint();

    let response = harness.get_with_bearer("/echo", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"].as_str(), Some("CLAIMS_FAILED"));
    let message = body["error"]["message"].as_str().unwrap_or_default();
    assert!(message.contains("token expired"), "{message}");
}

#[tokio::test]
async fn test_consumer_gone_is_403() {
    // Credential exists, its owning consumer does not
    let harness = FilterHarness::builder()
        .with_secret(test_hs256_secret(TEST_ISSUER_A, TEST_CONSUMER_ALICE))
        .build();
    let token = TestTokenBuilder::new().mint();

    let response = harness.get_with_bearer("/echo", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"].as_str(), Some("CONSUMER_NOT_FOUND"));
}

#[tokio::test]
async fn test_store_failure_is_500_with_generic_message() {
    let harness = harness();
    harness.secret_store.set_failing(true);
    let token = TestTokenBuilder::new().mint();

    let response = harness.get_with_bearer("/echo", &token).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(
        body["error"]["message"].as_str(),
        Some("An unexpected error occurred"),
        "store detail must not leak to the caller"
    );
}

#[tokio::test]
async fn test_non_string_key_claim_is_401_invalid() {
    let harness = harness();
    let token = TestTokenBuilder::new()
        .with_claim("iss", json!(12345))
        .mint();

    let response = harness.get_with_bearer("/echo", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"].as_str(), Some("INVALID_KEY_CLAIM"));
}
