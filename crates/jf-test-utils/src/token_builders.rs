//! Builder patterns for test data construction
//!
//! Provides fluent APIs for creating signed test tokens and the store
//! records they verify against.

use crate::test_ids::{TEST_HMAC_SECRET, TEST_ISSUER_A};
use chrono::{Duration, Utc};
use jf_service::models::{Consumer, JwtSecret};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Builder for creating signed test JWTs.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .issued_by("issuer-a")
///     .with_claim("sub", json!("alice"))
///     .expires_in(3600)
///     .mint();
/// ```
pub struct TestTokenBuilder {
    claims: Map<String, Value>,
    algorithm: Algorithm,
    secret: Vec<u8>,
    kid: Option<String>,
}

impl TestTokenBuilder {
    /// Create a builder with defaults: HS256, the shared test secret,
    /// `iss` = `issuer-a`, one hour to expiry.
    pub fn new() -> Self {
        let now = Utc::now();
        let mut claims = Map::new();
        claims.insert("iss".to_string(), json!(TEST_ISSUER_A));
        claims.insert(
            "exp".to_string(),
            json!((now + Duration::seconds(3600)).timestamp()),
        );
        claims.insert("iat".to_string(), json!(now.timestamp()));

        Self {
            claims,
            algorithm: Algorithm::HS256,
            secret: TEST_HMAC_SECRET.as_bytes().to_vec(),
            kid: None,
        }
    }

    /// Set the `iss` claim (the default credential lookup key).
    pub fn issued_by(mut self, issuer: &str) -> Self {
        self.claims.insert("iss".to_string(), json!(issuer));
        self
    }

    /// Set an arbitrary claim.
    pub fn with_claim(mut self, name: &str, value: Value) -> Self {
        self.claims.insert(name.to_string(), value);
        self
    }

    /// Remove a claim (e.g. to mint a token without `iss` or `exp`).
    pub fn without_claim(mut self, name: &str) -> Self {
        self.claims.remove(name);
        self
    }

    /// Set expiration in seconds from now (negative for an expired token).
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.claims.insert(
            "exp".to_string(),
            json!((Utc::now() + Duration::seconds(seconds)).timestamp()),
        );
        self
    }

    /// Set the signing algorithm (the `alg` header follows it).
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sign with a different HMAC secret (e.g. to forge a bad signature).
    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.as_bytes().to_vec();
        self
    }

    /// Set the `kid` header field.
    pub fn with_kid(mut self, kid: &str) -> Self {
        self.kid = Some(kid.to_string());
        self
    }

    /// Sign and serialize the token.
    pub fn mint(self) -> String {
        let mut header = Header::new(self.algorithm);
        header.kid = self.kid;
        encode(
            &header,
            &Value::Object(self.claims),
            &EncodingKey::from_secret(&self.secret),
        )
        .expect("test token should sign")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A stored HS256 credential whose key and owning consumer are given.
pub fn test_hs256_secret(key: &str, consumer_id: Uuid) -> JwtSecret {
    JwtSecret {
        id: Uuid::new_v4(),
        key: key.to_string(),
        algorithm: "HS256".to_string(),
        secret: Some(TEST_HMAC_SECRET.to_string()),
        rsa_public_key: None,
        consumer_id,
        created_at: Utc::now(),
    }
}

/// A consumer record with the given id and username.
pub fn test_consumer(id: Uuid, username: &str) -> Consumer {
    Consumer {
        id,
        custom_id: None,
        username: Some(username.to_string()),
        created_at: Utc::now(),
    }
}
