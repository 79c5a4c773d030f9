//! Token extraction from the inbound request.
//!
//! Sources are checked in fixed precedence order with no merging across
//! them: configured query parameters first, then configured cookies, then
//! the `Authorization` header with a `Bearer` scheme. Absence of a token is
//! a normal outcome; only a failure of the extraction mechanism itself
//! (undecodable header bytes) is an error.

use crate::config::FilterConfig;
use crate::errors::AuthError;
use axum::http::{header, request::Parts};
use std::collections::HashMap;

/// Result of the token search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// No source carried a token.
    None,
    /// Exactly one token was found.
    Single(String),
    /// More than one configured query parameter carried a value (or one
    /// parameter was repeated). Never merged, always rejected by the
    /// caller.
    Multiple,
}

/// Locate the raw credential string on the request.
pub fn locate(parts: &Parts, config: &FilterConfig) -> Result<Located, AuthError> {
    if let Some(found) = locate_in_query(parts, config) {
        return Ok(found);
    }

    if let Some(token) = locate_in_cookies(parts, config)? {
        return Ok(Located::Single(token));
    }

    if let Some(token) = locate_in_authorization(parts)? {
        return Ok(Located::Single(token));
    }

    Ok(Located::None)
}

/// Scan the query string for any configured parameter name.
///
/// A single match is returned even when its value is the empty string (the
/// verifier rejects it downstream with a precise reason). Two matches in
/// one request are ambiguous and surface as `Multiple`.
fn locate_in_query(parts: &Parts, config: &FilterConfig) -> Option<Located> {
    let query = parts.uri.query()?;

    let mut found: Option<String> = None;
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        if !config.uri_param_names.iter().any(|n| n.as_str() == name) {
            continue;
        }
        if found.is_some() {
            return Some(Located::Multiple);
        }
        found = Some(value.into_owned());
    }

    found.map(Located::Single)
}

/// Scan cookies for the configured names, in configuration order.
///
/// Empty cookie values are skipped: an expired-and-cleared session cookie
/// must not shadow a token arriving through the Authorization header.
fn locate_in_cookies(parts: &Parts, config: &FilterConfig) -> Result<Option<String>, AuthError> {
    if config.cookie_names.is_empty() {
        return Ok(None);
    }

    let mut jar: HashMap<&str, &str> = HashMap::new();
    for value in parts.headers.get_all(header::COOKIE) {
        let value = value.to_str().map_err(|e| {
            AuthError::TokenLocation(format!("Undecodable Cookie header: {}", e))
        })?;
        for pair in value.split(';') {
            if let Some((name, cookie_value)) = pair.split_once('=') {
                // First occurrence wins, matching proxy cookie semantics
                jar.entry(name.trim()).or_insert_with(|| cookie_value.trim());
            }
        }
    }

    for name in &config.cookie_names {
        if let Some(value) = jar.get(name.as_str()) {
            if !value.is_empty() {
                return Ok(Some((*value).to_string()));
            }
        }
    }

    Ok(None)
}

/// Extract a bearer token from the `Authorization` header.
fn locate_in_authorization(parts: &Parts) -> Result<Option<String>, AuthError> {
    for value in parts.headers.get_all(header::AUTHORIZATION) {
        let value = value.to_str().map_err(|e| {
            AuthError::TokenLocation(format!("Undecodable Authorization header: {}", e))
        })?;
        if let Some(token) = parse_bearer(value) {
            return Ok(Some(token));
        }
    }
    Ok(None)
}

/// Parse `Bearer <token>`, case-insensitive and whitespace-tolerant.
///
/// When the header carries trailing garbage after the token, the first
/// whitespace-delimited chunk wins.
fn parse_bearer(value: &str) -> Option<String> {
    let trimmed = value.trim_start();
    let (scheme, rest) = trimmed.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    rest.split_whitespace().next().map(str::to_string)
}
