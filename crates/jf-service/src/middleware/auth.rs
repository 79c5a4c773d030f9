//! axum middleware applying the authentication filter's decision.
//!
//! The filter itself only *decides*; this layer performs the request
//! mutations the decision calls for: identity headers toward the upstream,
//! request extensions for later filters and handlers, claim projection, and
//! rejection rendering.

use crate::filter::{
    AuthOutcome, AuthenticatedConsumer, AuthenticatedCredential, RequestFilter, VerifiedToken,
};
use crate::config::FilterConfig;
use crate::models::Consumer;
use crate::projection;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use common::headers;
use std::sync::Arc;

/// Middleware state: the route's filter and its configuration.
#[derive(Clone)]
pub struct AuthFilterState {
    pub filter: Arc<dyn RequestFilter>,
    pub config: Arc<FilterConfig>,
}

/// Authentication middleware for JWT-protected routes.
///
/// Strips inbound identity headers (callers must not be able to inject
/// identity), asks the filter for a decision, and applies it.
pub async fn jwt_auth(State(state): State<AuthFilterState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    strip_identity_headers(&mut parts.headers);

    match state.filter.decide(&parts, &state.config).await {
        None => next.run(Request::from_parts(parts, body)).await,

        Some(AuthOutcome::Authenticated {
            consumer,
            credential,
            token,
        }) => {
            set_consumer_headers(&mut parts.headers, &consumer);
            // Inbound marker was stripped above; a credentialed request
            // must reach the upstream without it.
            parts.headers.remove(headers::ANONYMOUS_CONSUMER);
            projection::project(&token, &state.config.claims_to_headers, &mut parts.headers);

            parts.extensions.insert(AuthenticatedCredential {
                credential_id: credential.id,
                consumer_id: credential.consumer_id,
            });
            parts.extensions.insert(AuthenticatedConsumer(consumer));
            parts.extensions.insert(VerifiedToken(token));

            next.run(Request::from_parts(parts, body)).await
        }

        Some(AuthOutcome::AnonymousFallback { consumer }) => {
            set_consumer_headers(&mut parts.headers, &consumer);
            parts
                .headers
                .insert(headers::ANONYMOUS_CONSUMER, HeaderValue::from_static("true"));
            // Anonymous admission carries no credential, only an identity
            parts.extensions.insert(AuthenticatedConsumer(consumer));

            next.run(Request::from_parts(parts, body)).await
        }

        Some(AuthOutcome::Rejected(err)) => err.into_response(),
    }
}

fn strip_identity_headers(headers: &mut HeaderMap) {
    for name in headers::ALL {
        headers.remove(*name);
    }
}

/// Write the resolved identity toward the upstream.
///
/// Fields absent on the consumer are cleared, not left over from whatever
/// an earlier filter set.
fn set_consumer_headers(headers: &mut HeaderMap, consumer: &Consumer) {
    if let Ok(value) = HeaderValue::from_str(&consumer.id.to_string()) {
        headers.insert(headers::CONSUMER_ID, value);
    }

    match consumer.custom_id.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
        Some(value) => {
            headers.insert(headers::CONSUMER_CUSTOM_ID, value);
        }
        None => {
            headers.remove(headers::CONSUMER_CUSTOM_ID);
        }
    }

    match consumer.username.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
        Some(value) => {
            headers.insert(headers::CONSUMER_USERNAME, value);
        }
        None => {
            headers.remove(headers::CONSUMER_USERNAME);
        }
    }
}
