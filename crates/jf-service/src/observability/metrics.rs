//! Metrics definitions for the JWT filter service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `jf_` prefix for the JWT filter
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `outcome`: 3 values (authenticated, anonymous, rejected)
//! - `status`: 2 values (success, error)
//! - `error_category`: 3 values (authentication, authorization, internal)
//! - `store`: 2 values (jwt_secrets, consumers)
//! - `result`: 4 values (hit, miss, negative, error)

use metrics::{counter, histogram};
use std::time::Duration;

// ============================================================================
// Decision Metrics
// ============================================================================

/// Record the terminal outcome of one authentication decision.
///
/// Metric: `jf_auth_decisions_total`
/// Labels: `outcome` (authenticated, anonymous, rejected)
///
/// Pass-through states (preflight skip, auth-chain short-circuit) are not
/// decisions and are not counted here.
pub fn record_auth_decision(outcome: &str) {
    counter!("jf_auth_decisions_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a token validation result.
///
/// Metric: `jf_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("jf_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

// ============================================================================
// Resolver / Store Metrics
// ============================================================================

/// Record a resolver cache lookup.
///
/// Metric: `jf_resolver_lookups_total`
/// Labels: `store` (secret, consumer), `result` (hit, miss, negative, error)
///
/// `negative` is a load that resolved to not-found; it is cached like any
/// other resolution.
pub fn record_resolver_lookup(store: &str, result: &str) {
    counter!("jf_resolver_lookups_total", "store" => store.to_string(), "result" => result.to_string())
        .increment(1);
}

/// Record one backing-store load issued by a resolver.
///
/// Metric: `jf_store_lookup_duration_seconds`, `jf_store_lookups_total`
/// Labels: `store` (jwt_secrets, consumers), `status` (success, error)
///
/// Under the single-flight contract, concurrent resolutions sharing a key
/// record exactly one store lookup.
pub fn record_store_lookup(store: &str, status: &str, duration: Duration) {
    histogram!("jf_store_lookup_duration_seconds", "store" => store.to_string())
        .record(duration.as_secs_f64());

    counter!("jf_store_lookups_total", "store" => store.to_string(), "status" => status.to_string())
        .increment(1);
}
