//! Token decoding and cryptographic verification.
//!
//! The verification order is load-bearing: the token names its own signing
//! secret through the configured key claim, so the claims are read *before*
//! any trust is established. Everything extracted from the token, the
//! lookup key included, stays untrusted input until the signature verifies
//! against the stored record, and the stored record (never the token)
//! decides the algorithm.

use crate::config::FilterConfig;
use crate::errors::{AuthError, ClaimFailure};
use crate::models::JwtSecret;
use crate::resolvers::SecretResolver;
use base64::{engine::general_purpose, Engine as _};
use common::secret::{ExposeSecret, SecretBox};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens larger than this are rejected before any base64 or JSON work,
/// bounding the resources an unauthenticated caller can consume. Typical
/// tokens are 200-800 bytes; 8KB leaves room for claim-heavy issuers.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Algorithm assumed when a stored credential does not name one.
pub const DEFAULT_ALGORITHM: &str = "HS256";

/// A structurally-decoded token.
///
/// Produced without signature verification; nothing in here is trustworthy
/// until [`JwtVerifier::verify`] returns it.
#[derive(Debug, Clone)]
pub struct DecodedJwt {
    pub header: Map<String, Value>,
    pub claims: Map<String, Value>,
}

/// Decode the compact form into header and claims without verifying trust.
///
/// Distinguishes two failure classes: a string that is not even shaped like
/// a compact token (`UnrecognizableToken`) and segments that fail to decode
/// (`BadToken`).
pub fn decode_unverified(token: &str) -> Result<DecodedJwt, AuthError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(AuthError::UnrecognizableToken);
    }

    let mut segments = token.split('.');
    let (header_b64, claims_b64) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(claims), Some(_signature), None) => (header, claims),
        _ => return Err(AuthError::UnrecognizableToken),
    };

    let header = decode_segment(header_b64).ok_or(AuthError::BadToken)?;
    let claims = decode_segment(claims_b64).ok_or(AuthError::BadToken)?;

    Ok(DecodedJwt { header, claims })
}

fn decode_segment(segment: &str) -> Option<Map<String, Value>> {
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(segment).ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Verifies located tokens against store-resolved credentials.
pub struct JwtVerifier {
    secrets: Arc<SecretResolver>,
}

impl JwtVerifier {
    pub fn new(secrets: Arc<SecretResolver>) -> Self {
        Self { secrets }
    }

    /// Run the full verification pipeline on a located token.
    ///
    /// On success both returned values are fully trusted: the claims have a
    /// verified signature and the credential is the record that verified
    /// them.
    #[instrument(skip_all)]
    pub async fn verify(
        &self,
        token: &str,
        config: &FilterConfig,
    ) -> Result<(DecodedJwt, Arc<JwtSecret>), AuthError> {
        let decoded = decode_unverified(token)?;

        // The lookup key is attacker-influenced until the signature check
        // below succeeds against the record it names.
        let secret_key = extract_secret_key(&decoded, &config.key_claim_name)?;

        let secret = self
            .secrets
            .resolve(&secret_key)
            .await?
            .ok_or_else(|| AuthError::SecretNotFound(config.key_claim_name.clone()))?;

        // The stored record pins the algorithm; a token that disagrees is
        // rejected before any key material is touched.
        let algorithm_name = if secret.algorithm.is_empty() {
            DEFAULT_ALGORITHM
        } else {
            secret.algorithm.as_str()
        };
        let token_alg = decoded
            .header
            .get("alg")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if token_alg != algorithm_name {
            tracing::debug!(
                token_alg,
                expected = algorithm_name,
                "Token rejected: algorithm does not match stored credential"
            );
            return Err(AuthError::InvalidAlgorithm);
        }
        let algorithm =
            Algorithm::from_str(algorithm_name).map_err(|_| AuthError::InvalidAlgorithm)?;

        let decoding_key = select_decoding_key(&secret, algorithm, config.secret_is_base64)?;
        verify_signature(token, &decoding_key, algorithm)?;
        verify_registered_claims(&decoded.claims, &config.claims_to_verify)?;

        Ok((decoded, secret))
    }
}

/// Read the credential lookup key from the claims, falling back to the
/// header only when the claims omit it entirely.
fn extract_secret_key(decoded: &DecodedJwt, key_claim_name: &str) -> Result<String, AuthError> {
    let value = decoded
        .claims
        .get(key_claim_name)
        .or_else(|| decoded.header.get(key_claim_name));

    match value {
        None => Err(AuthError::MissingKeyClaim(key_claim_name.to_string())),
        Some(Value::String(key)) if !key.is_empty() => Ok(key.clone()),
        Some(_) => Err(AuthError::InvalidKeyClaim(key_claim_name.to_string())),
    }
}

/// Pick and decode the key material the stored algorithm calls for.
///
/// The HMAC family verifies against `secret`; every asymmetric algorithm
/// verifies against the stored PEM public key. Exactly one of them must be
/// usable after optional base64 decoding.
fn select_decoding_key(
    secret: &JwtSecret,
    algorithm: Algorithm,
    secret_is_base64: bool,
) -> Result<DecodingKey, AuthError> {
    let is_hmac = matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    );

    let stored = if is_hmac {
        secret.secret.as_deref()
    } else {
        secret.rsa_public_key.as_deref()
    };
    let stored = stored
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::InvalidKeyMaterial)?;

    let material = decode_material(stored, secret_is_base64)?;

    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            Ok(DecodingKey::from_secret(material.expose_secret()))
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(material.expose_secret()),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(material.expose_secret()),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(material.expose_secret()),
    };

    key.map_err(|e| {
        tracing::debug!(error = %e, "Stored key material is unusable");
        AuthError::InvalidKeyMaterial
    })
}

fn decode_material(value: &str, is_base64: bool) -> Result<SecretBox<Vec<u8>>, AuthError> {
    let bytes = if is_base64 {
        general_purpose::STANDARD.decode(value).map_err(|e| {
            tracing::debug!(error = %e, "Stored key material is not valid base64");
            AuthError::InvalidKeyMaterial
        })?
    } else {
        value.as_bytes().to_vec()
    };
    Ok(SecretBox::new(Box::new(bytes)))
}

/// Verify only the signature; registered-claim semantics are validated
/// separately so the set of checked claims follows route configuration.
fn verify_signature(
    token: &str,
    key: &DecodingKey,
    algorithm: Algorithm,
) -> Result<(), AuthError> {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    decode::<Value>(token, key, &validation)
        .map(|_| ())
        .map_err(|e| {
            tracing::debug!(error = %e, "Signature verification failed");
            AuthError::InvalidSignature
        })
}

/// Validate registered claims, restricted to the configured set.
///
/// Failures accumulate across claims so one response reports all of them.
fn verify_registered_claims(
    claims: &Map<String, Value>,
    to_verify: &BTreeSet<String>,
) -> Result<(), AuthError> {
    let now = chrono::Utc::now().timestamp() as f64;
    let mut failures = Vec::new();

    for name in to_verify {
        let failure = |reason: &str| ClaimFailure {
            claim: name.clone(),
            reason: reason.to_string(),
        };

        match (name.as_str(), claims.get(name).and_then(Value::as_f64)) {
            (_, None) => failures.push(failure("must be a number")),
            ("exp", Some(exp)) if now >= exp => failures.push(failure("token expired")),
            ("nbf", Some(nbf)) if now < nbf => failures.push(failure("token not valid yet")),
            _ => {}
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(AuthError::ClaimsFailed(failures))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::resolvers::SecretStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use std::collections::HashMap;
    use uuid::Uuid;

    const TEST_SECRET: &[u8] = b"unit-test-signing-secret";

    struct MapSecretStore {
        secrets: HashMap<String, JwtSecret>,
    }

    #[async_trait]
    impl SecretStore for MapSecretStore {
        async fn get_by_key(&self, key: &str) -> Result<Option<JwtSecret>, AuthError> {
            Ok(self.secrets.get(key).cloned())
        }
    }

    fn make_record(key: &str, algorithm: &str, secret: Option<&str>) -> JwtSecret {
        JwtSecret {
            id: Uuid::new_v4(),
            key: key.to_string(),
            algorithm: algorithm.to_string(),
            secret: secret.map(str::to_string),
            rsa_public_key: None,
            consumer_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn verifier_for(records: Vec<JwtSecret>) -> JwtVerifier {
        let store = MapSecretStore {
            secrets: records.into_iter().map(|s| (s.key.clone(), s)).collect(),
        };
        JwtVerifier::new(Arc::new(SecretResolver::new(Arc::new(store))))
    }

    fn mint(algorithm: Algorithm, secret: &[u8], claims: &Value) -> String {
        let header = Header::new(algorithm);
        encode(&header, claims, &EncodingKey::from_secret(secret)).expect("mint token")
    }

    fn mint_with_kid(algorithm: Algorithm, secret: &[u8], claims: &Value, kid: &str) -> String {
        let mut header = Header::new(algorithm);
        header.kid = Some(kid.to_string());
        encode(&header, claims, &EncodingKey::from_secret(secret)).expect("mint token")
    }

    fn default_config() -> FilterConfig {
        FilterConfig::default()
    }

    fn fresh_claims(issuer: &str) -> Value {
        json!({
            "iss": issuer,
            "sub": "caller-1",
            "exp": Utc::now().timestamp() + 3600,
        })
    }

    #[tokio::test]
    async fn test_verify_happy_path_hs256() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(secret_value))]);
        let token = mint(Algorithm::HS256, TEST_SECRET, &fresh_claims("issuer-a"));

        let (decoded, record) = verifier
            .verify(&token, &default_config())
            .await
            .expect("verification should succeed");

        assert_eq!(record.key, "issuer-a");
        assert_eq!(decoded.claims.get("sub").and_then(Value::as_str), Some("caller-1"));
    }

    #[tokio::test]
    async fn test_verify_is_idempotent() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(secret_value))]);
        let token = mint(Algorithm::HS256, TEST_SECRET, &fresh_claims("issuer-a"));

        let first = verifier.verify(&token, &default_config()).await;
        let second = verifier.verify(&token, &default_config()).await;

        let (_, first_record) = first.expect("first verification");
        let (_, second_record) = second.expect("second verification");
        assert_eq!(first_record.id, second_record.id);
    }

    #[tokio::test]
    async fn test_key_claim_falls_back_to_header() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("key-from-header", "HS256", Some(secret_value))]);

        let claims = json!({ "exp": Utc::now().timestamp() + 3600 });
        let token = mint_with_kid(Algorithm::HS256, TEST_SECRET, &claims, "key-from-header");

        let config = FilterConfig {
            key_claim_name: "kid".to_string(),
            ..FilterConfig::default()
        };

        let result = verifier.verify(&token, &config).await;
        assert!(result.is_ok(), "header fallback should locate the credential");
    }

    #[tokio::test]
    async fn test_claims_take_precedence_over_header() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![
            make_record("claims-key", "HS256", Some(secret_value)),
            make_record("header-key", "HS256", Some("some-other-secret")),
        ]);

        let claims = json!({
            "kid": "claims-key",
            "exp": Utc::now().timestamp() + 3600,
        });
        let token = mint_with_kid(Algorithm::HS256, TEST_SECRET, &claims, "header-key");

        let config = FilterConfig {
            key_claim_name: "kid".to_string(),
            ..FilterConfig::default()
        };

        let (_, record) = verifier
            .verify(&token, &config)
            .await
            .expect("claims-sourced key should win");
        assert_eq!(record.key, "claims-key");
    }

    #[tokio::test]
    async fn test_missing_key_claim() {
        let verifier = verifier_for(vec![]);
        let claims = json!({ "exp": Utc::now().timestamp() + 3600 });
        let token = mint(Algorithm::HS256, TEST_SECRET, &claims);

        let result = verifier.verify(&token, &default_config()).await;
        assert!(matches!(result, Err(AuthError::MissingKeyClaim(claim)) if claim == "iss"));
    }

    #[tokio::test]
    async fn test_empty_key_claim_is_invalid() {
        let verifier = verifier_for(vec![]);
        let token = mint(
            Algorithm::HS256,
            TEST_SECRET,
            &json!({ "iss": "", "exp": Utc::now().timestamp() + 3600 }),
        );

        let result = verifier.verify(&token, &default_config()).await;
        assert!(matches!(result, Err(AuthError::InvalidKeyClaim(claim)) if claim == "iss"));
    }

    #[tokio::test]
    async fn test_non_string_key_claim_is_invalid() {
        let verifier = verifier_for(vec![]);
        let token = mint(
            Algorithm::HS256,
            TEST_SECRET,
            &json!({ "iss": 42, "exp": Utc::now().timestamp() + 3600 }),
        );

        let result = verifier.verify(&token, &default_config()).await;
        assert!(matches!(result, Err(AuthError::InvalidKeyClaim(_))));
    }

    #[tokio::test]
    async fn test_unknown_key_is_secret_not_found() {
        let verifier = verifier_for(vec![]);
        let token = mint(Algorithm::HS256, TEST_SECRET, &fresh_claims("ghost-issuer"));

        let result = verifier.verify(&token, &default_config()).await;
        assert!(matches!(result, Err(AuthError::SecretNotFound(_))));
    }

    #[tokio::test]
    async fn test_algorithm_mismatch_rejected_despite_valid_signature() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        // Record pins HS256; token is signed (correctly!) with HS384
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(secret_value))]);
        let token = mint(Algorithm::HS384, TEST_SECRET, &fresh_claims("issuer-a"));

        let result = verifier.verify(&token, &default_config()).await;
        assert!(matches!(result, Err(AuthError::InvalidAlgorithm)));
    }

    #[tokio::test]
    async fn test_unparseable_stored_algorithm_rejected() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("issuer-a", "HS666", Some(secret_value))]);

        // Hand-craft a token whose header alg matches the bogus stored
        // string, so the mismatch pin passes and parsing must reject it
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS666","typ":"JWT"}"#);
        let claims = general_purpose::URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&fresh_claims("issuer-a")).unwrap(),
        );
        let token = format!("{header}.{claims}.c2ln");

        let result = verifier.verify(&token, &default_config()).await;
        assert!(matches!(result, Err(AuthError::InvalidAlgorithm)));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_invalid_signature() {
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some("the-real-secret"))]);
        let token = mint(Algorithm::HS256, b"a-different-secret", &fresh_claims("issuer-a"));

        let result = verifier.verify(&token, &default_config()).await;
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[tokio::test]
    async fn test_tampered_claims_are_invalid_signature() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(secret_value))]);
        let token = mint(Algorithm::HS256, TEST_SECRET, &fresh_claims("issuer-a"));

        // Swap in a forged claims segment, keeping the original signature
        let forged_claims = general_purpose::URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&json!({
                "iss": "issuer-a",
                "sub": "someone-else",
                "exp": Utc::now().timestamp() + 3600,
            }))
            .unwrap(),
        );
        let parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        let result = verifier.verify(&tampered, &default_config()).await;
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[tokio::test]
    async fn test_missing_secret_value_is_invalid_key_material() {
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", None)]);
        let token = mint(Algorithm::HS256, TEST_SECRET, &fresh_claims("issuer-a"));

        let result = verifier.verify(&token, &default_config()).await;
        assert!(matches!(result, Err(AuthError::InvalidKeyMaterial)));
    }

    #[tokio::test]
    async fn test_base64_secret_decoded_before_use() {
        let encoded = general_purpose::STANDARD.encode(TEST_SECRET);
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(&encoded))]);
        let token = mint(Algorithm::HS256, TEST_SECRET, &fresh_claims("issuer-a"));

        let config = FilterConfig {
            secret_is_base64: true,
            ..FilterConfig::default()
        };

        let result = verifier.verify(&token, &config).await;
        assert!(result.is_ok(), "base64 secret should decode and verify");
    }

    #[tokio::test]
    async fn test_invalid_base64_secret_is_invalid_key_material() {
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some("!!not-base64!!"))]);
        let token = mint(Algorithm::HS256, TEST_SECRET, &fresh_claims("issuer-a"));

        let config = FilterConfig {
            secret_is_base64: true,
            ..FilterConfig::default()
        };

        let result = verifier.verify(&token, &config).await;
        assert!(matches!(result, Err(AuthError::InvalidKeyMaterial)));
    }

    #[tokio::test]
    async fn test_expired_token_fails_exp_check() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(secret_value))]);
        let token = mint(
            Algorithm::HS256,
            TEST_SECRET,
            &json!({ "iss": "issuer-a", "exp": Utc::now().timestamp() - 60 }),
        );

        let result = verifier.verify(&token, &default_config()).await;
        match result {
            Err(AuthError::ClaimsFailed(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].claim, "exp");
                assert_eq!(failures[0].reason, "token expired");
            }
            other => panic!("expected ClaimsFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_future_nbf_fails_when_configured() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(secret_value))]);
        let token = mint(
            Algorithm::HS256,
            TEST_SECRET,
            &json!({
                "iss": "issuer-a",
                "exp": Utc::now().timestamp() + 3600,
                "nbf": Utc::now().timestamp() + 600,
            }),
        );

        let config = FilterConfig {
            claims_to_verify: BTreeSet::from(["exp".to_string(), "nbf".to_string()]),
            ..FilterConfig::default()
        };

        let result = verifier.verify(&token, &config).await;
        match result {
            Err(AuthError::ClaimsFailed(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].claim, "nbf");
                assert_eq!(failures[0].reason, "token not valid yet");
            }
            other => panic!("expected ClaimsFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_configured_claim_missing_from_token() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(secret_value))]);
        // No exp claim at all
        let token = mint(Algorithm::HS256, TEST_SECRET, &json!({ "iss": "issuer-a" }));

        let result = verifier.verify(&token, &default_config()).await;
        match result {
            Err(AuthError::ClaimsFailed(failures)) => {
                assert_eq!(failures[0].claim, "exp");
                assert_eq!(failures[0].reason, "must be a number");
            }
            other => panic!("expected ClaimsFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_claim_failures_accumulate() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(secret_value))]);
        let token = mint(
            Algorithm::HS256,
            TEST_SECRET,
            &json!({
                "iss": "issuer-a",
                "exp": Utc::now().timestamp() - 60,
                "nbf": Utc::now().timestamp() + 600,
            }),
        );

        let config = FilterConfig {
            claims_to_verify: BTreeSet::from(["exp".to_string(), "nbf".to_string()]),
            ..FilterConfig::default()
        };

        let result = verifier.verify(&token, &config).await;
        match result {
            Err(AuthError::ClaimsFailed(failures)) => {
                assert_eq!(failures.len(), 2, "both failures reported at once");
            }
            other => panic!("expected ClaimsFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unverifiable_claims_skip_registered_checks() {
        let secret_value = std::str::from_utf8(TEST_SECRET).unwrap();
        let verifier = verifier_for(vec![make_record("issuer-a", "HS256", Some(secret_value))]);
        // Expired token, but nothing configured for verification
        let token = mint(
            Algorithm::HS256,
            TEST_SECRET,
            &json!({ "iss": "issuer-a", "exp": Utc::now().timestamp() - 60 }),
        );

        let config = FilterConfig {
            claims_to_verify: BTreeSet::new(),
            ..FilterConfig::default()
        };

        let result = verifier.verify(&token, &config).await;
        assert!(result.is_ok(), "unconfigured claims are not checked");
    }

    #[test]
    fn test_decode_unverified_rejects_wrong_segment_count() {
        for token in ["", "only-one", "two.segments", "a.b.c.d"] {
            let result = decode_unverified(token);
            assert!(
                matches!(result, Err(AuthError::UnrecognizableToken)),
                "{token:?}"
            );
        }
    }

    #[test]
    fn test_decode_unverified_rejects_undecodable_segments() {
        let result = decode_unverified("!!!.???.sig");
        assert!(matches!(result, Err(AuthError::BadToken)));
    }

    #[test]
    fn test_decode_unverified_rejects_non_object_claims() {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let claims = general_purpose::URL_SAFE_NO_PAD.encode(b"[1,2,3]");
        let token = format!("{header}.{claims}.sig");

        let result = decode_unverified(&token);
        assert!(matches!(result, Err(AuthError::BadToken)));
    }

    #[test]
    fn test_decode_unverified_rejects_oversized_token() {
        let oversized = "a".repeat(MAX_JWT_SIZE_BYTES + 1);
        let result = decode_unverified(&oversized);
        assert!(matches!(result, Err(AuthError::UnrecognizableToken)));
    }
}
