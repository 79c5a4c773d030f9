//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate with
//! Gatehouse-specific guidance. Use these types for all sensitive values
//! like signing secrets, tokens, and cryptographic key material.
//!
//! # Compile-Time Safety
//!
//! The key insight is that `SecretBox<T>` and `SecretString` implement `Debug`
//! with redaction, so any code that derives `Debug` on a struct containing secrets
//! will automatically get safe logging behavior. This makes it **impossible** to
//! accidentally log secrets via `{:?}` or tracing.
//!
//! # Memory Safety
//!
//! Secrets are automatically zeroized when dropped, preventing sensitive
//! data from lingering in memory after use.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct CredentialRecord {
//!     key: String,
//!     signing_secret: SecretString,  // Safe: Debug shows "[REDACTED]"
//! }
//!
//! let record = CredentialRecord {
//!     key: "issuer-a".to_string(),
//!     signing_secret: SecretString::from("hunter2"),
//! };
//!
//! // This is safe - the signing secret is redacted
//! println!("{:?}", record);
//!
//! // To access the actual value, you must explicitly call expose_secret()
//! let secret: &str = record.signing_secret.expose_secret();
//! # let _ = secret;
//! ```
//!
//! # Gatehouse Usage Guidelines
//!
//! Use `SecretString` for:
//! - HMAC signing secrets
//! - Bearer tokens
//! - Encryption keys (as base64 strings)
//!
//! Use `SecretBox<T>` for:
//! - Custom secret types (e.g., `SecretBox<Vec<u8>>` for decoded key bytes)
//!
//! # Serde Integration
//!
//! With the `serde` feature enabled, secrets can be deserialized from JSON:
//!
//! ```rust
//! use serde::Deserialize;
//! use common::secret::SecretString;
//!
//! #[derive(Debug, Deserialize)]
//! struct StoredCredential {
//!     key: String,
//!     secret: SecretString,
//! }
//!
//! let json = r#"{"key": "issuer-a", "secret": "signing-key"}"#;
//! let cred: StoredCredential = serde_json::from_str(json).unwrap();
//!
//! // Debug output is safe
//! println!("{:?}", cred);
//! // key is visible, secret is redacted
//! ```

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};
