//! E2E tests for the single-flight resolution contract.
//!
//! The resolvers' unit tests cover the cache mechanics in isolation; these
//! verify the property end-to-end: concurrent requests authenticating
//! against the same credential key trigger at most one store load.

use axum::http::StatusCode;
use jf_test_utils::{
    test_consumer, test_hs256_secret, FilterHarness, TestTokenBuilder, TEST_CONSUMER_ALICE,
    TEST_ISSUER_A,
};
use std::sync::Arc;

fn harness() -> FilterHarness {
    FilterHarness::builder()
        .with_secret(test_hs256_secret(TEST_ISSUER_A, TEST_CONSUMER_ALICE))
        .with_consumer(test_consumer(TEST_CONSUMER_ALICE, "alice"))
        .build()
}

#[tokio::test]
async fn test_concurrent_requests_share_one_secret_load() {
    let harness = Arc::new(harness());
    let token = TestTokenBuilder::new().mint();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let harness = Arc::clone(&harness);
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            harness.get_with_bearer("/echo", &token).await.status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.expect("task joins"), StatusCode::OK);
    }

    assert_eq!(
        harness.secret_store.calls(),
        1,
        "concurrent authentications for one key must share a single load"
    );
    assert_eq!(
        harness.consumer_store.calls(),
        1,
        "the shared consumer id must also load once"
    );
}

#[tokio::test]
async fn test_sequential_requests_served_from_cache() {
    let harness = harness();
    let token = TestTokenBuilder::new().mint();

    for _ in 0..5 {
        let response = harness.get_with_bearer("/echo", &token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(harness.secret_store.calls(), 1);
}

#[tokio::test]
async fn test_store_recovery_after_failure() {
    let harness = harness();
    let token = TestTokenBuilder::new().mint();

    harness.secret_store.set_failing(true);
    let response = harness.get_with_bearer("/echo", &token).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Errors are not cached: once the store recovers, the request succeeds
    harness.secret_store.set_failing(false);
    let response = harness.get_with_bearer("/echo", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}
