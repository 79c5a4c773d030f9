//! Claim-to-header projection.
//!
//! After a successful authentication, selected claim values are copied into
//! upstream-visible headers. Projection runs strictly after verification,
//! so the decode here is structural only. Absent claims, null values, and
//! values that cannot form a header are silently skipped: a projection miss
//! is a normal no-op, never an error.

use crate::config::ClaimHeaderMapping;
use crate::verifier;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// Project configured claim values into the header map.
///
/// Mappings are applied in configuration order; when two paths target the
/// same header the last write wins.
pub fn project(token: &str, mappings: &[ClaimHeaderMapping], headers: &mut HeaderMap) {
    if mappings.is_empty() {
        return;
    }

    // Decode-only: this token already passed signature verification
    let decoded = match verifier::decode_unverified(token) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(error = %err, "Skipping claim projection: token no longer decodes");
            return;
        }
    };
    let claims = Value::Object(decoded.claims);

    for mapping in mappings {
        let Some(value) = evaluate_path(&claims, &mapping.claim) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let Some(rendered) = render_header_value(value) else {
            continue;
        };

        let Ok(name) = HeaderName::from_bytes(mapping.header.as_bytes()) else {
            tracing::debug!(header = %mapping.header, "Skipping claim projection: invalid header name");
            continue;
        };
        let Ok(header_value) = HeaderValue::from_str(&rendered) else {
            tracing::debug!(header = %mapping.header, "Skipping claim projection: value not header-safe");
            continue;
        };

        headers.insert(name, header_value);
    }
}

/// Render a claim value as a header string.
///
/// Scalars go through verbatim; composites are JSON-encoded so structure
/// survives the transport.
fn render_header_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
        Value::Null => None,
    }
}

/// One step of a parsed claim path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// Evaluate a dotted/bracket path against a claim tree.
///
/// Supported syntax, by explicit recursive descent rather than a general
/// query language: `a.b.c`, `a["dotted.name"]`, `a['x']`, `roles[0]`, and
/// combinations thereof. Returns `None` for syntax errors and for paths
/// that do not exist in the tree.
fn evaluate_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse_path(path)?;
    let mut current = root;
    for segment in &segments {
        current = match segment {
            Segment::Field(name) => current.as_object()?.get(name)?,
            Segment::Index(i) => current.as_array()?.get(*i)?,
        };
    }
    Some(current)
}

fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = path;
    let mut first = true;

    while !rest.is_empty() {
        if let Some(after_open) = rest.strip_prefix('[') {
            let close = after_open.find(']')?;
            let inner = after_open.get(..close)?.trim();
            let segment = match strip_quotes(inner) {
                Some(quoted) => Segment::Field(quoted.to_string()),
                None => Segment::Index(inner.parse().ok()?),
            };
            segments.push(segment);
            rest = after_open.get(close + 1..)?;
            first = false;
            continue;
        }

        // After the first component, a bare field must be introduced by `.`
        let component = if first { rest } else { rest.strip_prefix('.')? };
        let end = component.find(['.', '[']).unwrap_or(component.len());
        if end == 0 {
            // Empty field name: leading/trailing/double dots
            return None;
        }
        segments.push(Segment::Field(component.get(..end)?.to_string()));
        rest = component.get(end..)?;
        first = false;
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments)
}

fn strip_quotes(s: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return s.get(1..s.len() - 1);
        }
    }
    None
}
