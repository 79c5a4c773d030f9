use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::env;
use thiserror::Error;
use uuid::Uuid;

/// Registered claims this filter knows how to validate.
const VERIFIABLE_CLAIMS: &[&str] = &["exp", "nbf"];

/// One claim-to-header projection rule.
///
/// `claim` is a dotted/bracket path into the token's claims
/// (e.g. `realm_access.roles` or `resource["client-one"].id`);
/// `header` is the upstream-visible header the value lands in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimHeaderMapping {
    pub claim: String,
    pub header: String,
}

/// Per-route filter configuration.
///
/// Loaded once per route and never mutated by the filter. Field defaults
/// mirror the conventional gateway setup: tokens arrive in a `jwt` query
/// parameter or a `Bearer` Authorization header, the `iss` claim names the
/// credential, and expiry is the only claim validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Query parameter names checked for a token, in precedence order.
    pub uri_param_names: Vec<String>,
    /// Cookie names checked for a token, in precedence order.
    pub cookie_names: Vec<String>,
    /// Claim (or header field) naming the credential lookup key.
    pub key_claim_name: String,
    /// Registered claims validated after signature verification.
    pub claims_to_verify: BTreeSet<String>,
    /// Whether stored key material is base64 and needs decoding before use.
    pub secret_is_base64: bool,
    /// Consumer admitted when no credential is presented. `None` disables
    /// anonymous fallback entirely.
    pub anonymous: Option<Uuid>,
    /// Whether `OPTIONS` preflight requests are authenticated.
    pub run_on_preflight: bool,
    /// Claim values copied into upstream-visible headers after a
    /// successful authentication.
    pub claims_to_headers: Vec<ClaimHeaderMapping>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            uri_param_names: vec!["jwt".to_string()],
            cookie_names: Vec::new(),
            key_claim_name: "iss".to_string(),
            claims_to_verify: BTreeSet::from(["exp".to_string()]),
            secret_is_base64: false,
            anonymous: None,
            run_on_preflight: true,
            claims_to_headers: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Validate option combinations that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for claim in &self.claims_to_verify {
            if !VERIFIABLE_CLAIMS.contains(&claim.as_str()) {
                return Err(ConfigError::UnknownVerifiableClaim(claim.clone()));
            }
        }
        if self.key_claim_name.is_empty() {
            return Err(ConfigError::EmptyKeyClaimName);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub filter: FilterConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid filter configuration: {0}")]
    InvalidFilterConfig(#[from] serde_json::Error),

    #[error("'{0}' is not a verifiable registered claim")]
    UnknownVerifiableClaim(String),

    #[error("key_claim_name must not be empty")]
    EmptyKeyClaimName,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8083".to_string());

        let filter = match vars.get("JF_FILTER_CONFIG") {
            Some(raw) => serde_json::from_str(raw)?,
            None => FilterConfig::default(),
        };
        filter.validate()?;

        Ok(Config {
            database_url,
            bind_address,
            filter,
        })
    }
}
