//! Identity headers set by the gateway's authentication filters.
//!
//! These headers are the contract between the authentication layer and
//! upstream services: after a filter has made its decision, the upstream
//! reads the caller identity from these headers instead of re-validating
//! the credential. Names are kept in the lowercase wire form the `http`
//! crate canonicalizes to; matching is case-insensitive on the wire.
//!
//! Inbound values of these headers are never trusted. Filters strip them
//! from the client request before deciding, so only gateway-set values
//! ever reach an upstream.

/// Resolved consumer id (UUID) of the authenticated caller.
pub const CONSUMER_ID: &str = "x-consumer-id";

/// Operator-assigned external id of the authenticated caller, if any.
pub const CONSUMER_CUSTOM_ID: &str = "x-consumer-custom-id";

/// Username of the authenticated caller, if any.
pub const CONSUMER_USERNAME: &str = "x-consumer-username";

/// Set to `"true"` when the request was admitted via the anonymous
/// fallback consumer rather than a verified credential. Cleared on
/// credentialed authentication.
pub const ANONYMOUS_CONSUMER: &str = "x-anonymous-consumer";

/// All identity headers, for stripping inbound values in one pass.
pub const ALL: &[&str] = &[
    CONSUMER_ID,
    CONSUMER_CUSTOM_ID,
    CONSUMER_USERNAME,
    ANONYMOUS_CONSUMER,
];
