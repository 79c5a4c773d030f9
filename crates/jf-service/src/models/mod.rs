use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// JWT credential model (maps to jwt_secrets table).
///
/// The `key` is the lookup identifier carried inside tokens via the
/// configured key claim. It is attacker-influenced input right up until the
/// signature verifies against the material stored here.
#[derive(Clone, FromRow)]
pub struct JwtSecret {
    pub id: Uuid,
    pub key: String,
    /// Signing algorithm this record verifies against ("HS256" when empty).
    /// The token's `alg` header must match; the token never chooses.
    pub algorithm: String,
    /// HMAC secret; authoritative for the HS algorithm family.
    pub secret: Option<String>,
    /// PEM public key; authoritative for every asymmetric algorithm.
    pub rsa_public_key: Option<String>,
    pub consumer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Custom Debug implementation that redacts the signing secret.
///
/// The secret is live key material; it must never reach logs or debug
/// output, including through structs that embed this one.
impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSecret")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("algorithm", &self.algorithm)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("rsa_public_key", &self.rsa_public_key)
            .field("consumer_id", &self.consumer_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Consumer model (maps to consumers table).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Consumer {
    pub id: Uuid,
    /// Operator-assigned external identifier, if any.
    pub custom_id: Option<String>,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}
