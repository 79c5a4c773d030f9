//! E2E tests for claim-to-header projection.

use jf_test_utils::{
    json_body, test_consumer, test_hs256_secret, FilterHarness, TestTokenBuilder,
    TEST_CONSUMER_ALICE, TEST_ISSUER_A,
};
use jf_service::config::{ClaimHeaderMapping, FilterConfig};
use serde_json::json;

fn mapping(claim: &str, header: &str) -> ClaimHeaderMapping {
    ClaimHeaderMapping {
        claim: claim.to_string(),
        header: header.to_string(),
    }
}

fn harness_with_mappings(mappings: Vec<ClaimHeaderMapping>) -> FilterHarness {
    FilterHarness::builder()
        .with_config(FilterConfig {
            claims_to_headers: mappings,
            ..FilterConfig::default()
        })
        .with_secret(test_hs256_secret(TEST_ISSUER_A, TEST_CONSUMER_ALICE))
        .with_consumer(test_consumer(TEST_CONSUMER_ALICE, "alice"))
        .build()
}

#[tokio::test]
async fn test_present_claim_projected_to_configured_header() {
    let harness = harness_with_mappings(vec![mapping("sub", "x-token-sub")]);
    let token = TestTokenBuilder::new()
        .with_claim("sub", json!("caller-1"))
        .mint();

    let body = json_body(harness.get_with_bearer("/echo", &token).await).await;

    assert_eq!(body["x-token-sub"].as_str(), Some("caller-1"));
}

#[tokio::test]
async fn test_nested_claim_path_projected() {
    let harness = harness_with_mappings(vec![mapping("realm_access.tier", "x-caller-tier")]);
    let token = TestTokenBuilder::new()
        .with_claim("realm_access", json!({ "tier": "gold" }))
        .mint();

    let body = json_body(harness.get_with_bearer("/echo", &token).await).await;

    assert_eq!(body["x-caller-tier"].as_str(), Some("gold"));
}

#[tokio::test]
async fn test_absent_claim_sets_no_header_and_does_not_fail() {
    let harness = harness_with_mappings(vec![
        mapping("sub", "x-token-sub"),
        mapping("department", "x-department"),
    ]);
    let token = TestTokenBuilder::new()
        .with_claim("sub", json!("caller-1"))
        .mint();

    let response = harness.get_with_bearer("/echo", &token).await;

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["x-token-sub"].as_str(), Some("caller-1"));
    assert!(body.get("x-department").is_none());
}

#[tokio::test]
async fn test_array_claim_projected_as_json() {
    let harness = harness_with_mappings(vec![mapping("roles", "x-roles")]);
    let token = TestTokenBuilder::new()
        .with_claim("roles", json!(["admin", "auditor"]))
        .mint();

    let body = json_body(harness.get_with_bearer("/echo", &token).await).await;

    assert_eq!(body["x-roles"].as_str(), Some(r#"["admin","auditor"]"#));
}

#[tokio::test]
async fn test_projection_skipped_on_rejection() {
    let harness = harness_with_mappings(vec![mapping("sub", "x-token-sub")]);
    let forged = TestTokenBuilder::new()
        .with_claim("sub", json!("caller-1"))
        .signed_with("wrong-secret")
        .mint();

    let response = harness.get_with_bearer("/echo", &forged).await;

    assert_eq!(response.status(), axum::http::StatusCode::FORBIDDEN);
}
