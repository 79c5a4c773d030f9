//! # JF Test Utilities
//!
//! Shared test utilities for the JWT filter service.
//!
//! This crate provides:
//! - In-memory store doubles with call counting and failure injection
//! - A test token builder minting signed HS256 tokens
//! - An in-process filter harness (router + echo upstream) for E2E tests
//! - Fixed test IDs for deterministic tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jf_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let harness = FilterHarness::builder()
//!         .with_secret(test_hs256_secret("issuer-a", TEST_CONSUMER_ALICE))
//!         .with_consumer(test_consumer(TEST_CONSUMER_ALICE, "alice"))
//!         .build();
//!
//!     let token = TestTokenBuilder::new().issued_by("issuer-a").mint();
//!     let response = harness.get_with_bearer("/echo", &token).await;
//! }
//! ```

pub mod harness;
pub mod stores;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use harness::*;
pub use stores::*;
pub use test_ids::*;
pub use token_builders::*;
