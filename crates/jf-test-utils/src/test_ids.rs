//! Fixed test IDs for deterministic tests
//!
//! All test IDs are deterministic to ensure reproducible test results.
//! Using fixed UUIDs prevents flaky tests caused by random data.

use uuid::Uuid;

// Consumer IDs (100-199)
pub const TEST_CONSUMER_ALICE: Uuid = Uuid::from_u128(100);
pub const TEST_CONSUMER_BOB: Uuid = Uuid::from_u128(101);
pub const TEST_CONSUMER_ANONYMOUS: Uuid = Uuid::from_u128(199);

// Credential IDs (1-99)
pub const TEST_CREDENTIAL_ID_1: Uuid = Uuid::from_u128(1);
pub const TEST_CREDENTIAL_ID_2: Uuid = Uuid::from_u128(2);

// Credential lookup keys
pub const TEST_ISSUER_A: &str = "issuer-a";
pub const TEST_ISSUER_B: &str = "issuer-b";

// Signing secrets
pub const TEST_HMAC_SECRET: &str = "test-hmac-secret-do-not-use-in-production";
pub const TEST_OTHER_HMAC_SECRET: &str = "another-test-hmac-secret";
