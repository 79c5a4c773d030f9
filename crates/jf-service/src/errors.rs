use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// A single registered-claim validation failure.
///
/// Failures are accumulated across all configured claims so the caller
/// sees every problem in one response instead of fixing them one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimFailure {
    pub claim: String,
    pub reason: String,
}

fn format_claim_failures(failures: &[ClaimFailure]) -> String {
    let parts: Vec<String> = failures
        .iter()
        .map(|f| format!("{}: {}", f.claim, f.reason))
        .collect();
    parts.join("; ")
}

/// Authentication rejection taxonomy.
///
/// Every failure is classified at the point of detection; the orchestrator
/// never re-interprets a variant, it only decides between rejecting and
/// falling back to the anonymous consumer. Variants map onto exactly three
/// wire outcomes: 401 (the caller presented no usable credential), 403 (the
/// credential was understood but is not acceptable), and 500 (this service
/// or its backing store failed).
#[derive(Debug, Error)]
pub enum AuthError {
    /// The extraction mechanism itself failed (e.g. undecodable header
    /// bytes). Distinct from "no token found", which is not an error.
    #[error("Token extraction failed: {0}")]
    TokenLocation(String),

    #[error("Unauthorized")]
    NoToken,

    #[error("Multiple tokens provided")]
    MultipleTokens,

    /// The located string is not shaped like a compact token at all.
    #[error("Unrecognizable token")]
    UnrecognizableToken,

    /// Compact segments exist but do not decode.
    #[error("Bad token")]
    BadToken,

    #[error("No mandatory '{0}' in claims")]
    MissingKeyClaim(String),

    #[error("Invalid '{0}' in claims")]
    InvalidKeyClaim(String),

    #[error("No credentials found for given '{0}'")]
    SecretNotFound(String),

    #[error("Invalid algorithm")]
    InvalidAlgorithm,

    #[error("Invalid key/secret")]
    InvalidKeyMaterial,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token claims invalid: {}", format_claim_failures(.0))]
    ClaimsFailed(Vec<ClaimFailure>),

    #[error("Could not find consumer for '{key_claim_name}={key}'")]
    ConsumerNotFound { key_claim_name: String, key: String },

    /// The anonymous consumer is configured but missing from the store.
    /// This is operator misconfiguration, not a caller error.
    #[error("anonymous consumer {0} is configured but doesn't exist")]
    AnonymousNotFound(Uuid),

    /// Backing-store failure. Always fatal for the request, never
    /// downgraded to a rejection, never retried here.
    #[error("Database error: {0}")]
    Database(String),
}

impl AuthError {
    /// HTTP status this rejection maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoToken
            | AuthError::MultipleTokens
            | AuthError::UnrecognizableToken
            | AuthError::BadToken
            | AuthError::MissingKeyClaim(_)
            | AuthError::InvalidKeyClaim(_)
            | AuthError::ClaimsFailed(_) => StatusCode::UNAUTHORIZED,

            AuthError::SecretNotFound(_)
            | AuthError::InvalidAlgorithm
            | AuthError::InvalidKeyMaterial
            | AuthError::InvalidSignature
            | AuthError::ConsumerNotFound { .. } => StatusCode::FORBIDDEN,

            AuthError::TokenLocation(_)
            | AuthError::AnonymousNotFound(_)
            | AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenLocation(_) => "TOKEN_EXTRACTION_ERROR",
            AuthError::NoToken => "NO_TOKEN",
            AuthError::MultipleTokens => "MULTIPLE_TOKENS",
            AuthError::UnrecognizableToken => "UNRECOGNIZABLE_TOKEN",
            AuthError::BadToken => "BAD_TOKEN",
            AuthError::MissingKeyClaim(_) => "MISSING_KEY_CLAIM",
            AuthError::InvalidKeyClaim(_) => "INVALID_KEY_CLAIM",
            AuthError::SecretNotFound(_) => "NO_CREDENTIALS_FOUND",
            AuthError::InvalidAlgorithm => "INVALID_ALGORITHM",
            AuthError::InvalidKeyMaterial => "INVALID_KEY_SECRET",
            AuthError::InvalidSignature => "INVALID_SIGNATURE",
            AuthError::ClaimsFailed(_) => "CLAIMS_FAILED",
            AuthError::ConsumerNotFound { .. } => "CONSUMER_NOT_FOUND",
            AuthError::AnonymousNotFound(_) => "ANONYMOUS_CONSUMER_MISSING",
            AuthError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Bounded label for the `error_category` metric dimension.
    pub fn category(&self) -> &'static str {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "authentication",
            StatusCode::FORBIDDEN => "authorization",
            _ => "internal",
        }
    }

    /// Whether a credential was actually supplied by the caller.
    ///
    /// The orchestrator uses this to gate anonymous fallback: a request that
    /// carried a token (however broken) must never be silently admitted as
    /// anonymous.
    pub fn token_was_located(&self) -> bool {
        !matches!(self, AuthError::NoToken)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures carry store/system detail that must not reach
        // the caller; log it and send a generic body instead.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request rejected by internal failure");
            "An unexpected error occurred".to_string()
        } else {
            self.to_string()
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
