//! The authentication decision engine.
//!
//! [`AuthenticationFilter`] composes the locator, verifier, and resolvers
//! into the per-request state machine, and is the *only* place that decides
//! between rejecting a request and admitting it as the anonymous consumer.
//! Every component below it classifies failures at the point of detection
//! and propagates them untouched.

use crate::config::FilterConfig;
use crate::errors::AuthError;
use crate::locator::{self, Located};
use crate::models::{Consumer, JwtSecret};
use crate::observability::metrics::{record_auth_decision, record_token_validation};
use crate::resolvers::{ConsumerResolver, SecretResolver};
use crate::verifier::JwtVerifier;
use async_trait::async_trait;
use axum::http::{request::Parts, Method};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Terminal result of one authentication decision.
///
/// Pass-through states (preflight skip, auth-chain short-circuit) produce
/// no outcome at all; a request yields at most one of these.
#[derive(Debug)]
pub enum AuthOutcome {
    /// A credential was located, verified, and mapped to its consumer.
    Authenticated {
        consumer: Arc<Consumer>,
        credential: Arc<JwtSecret>,
        token: String,
    },
    /// No credential was presented and the route admits anonymous callers.
    /// Never carries a credential.
    AnonymousFallback { consumer: Arc<Consumer> },
    /// The request is refused with the classified status and message.
    Rejected(AuthError),
}

/// Request extension recording a verified credential.
///
/// Later filters in an authentication chain read this to skip their own
/// verification once one method has succeeded.
#[derive(Debug, Clone)]
pub struct AuthenticatedCredential {
    pub credential_id: Uuid,
    pub consumer_id: Uuid,
}

/// Request extension carrying the resolved caller identity.
#[derive(Debug, Clone)]
pub struct AuthenticatedConsumer(pub Arc<Consumer>);

/// Request extension carrying the raw verified token for downstream use.
#[derive(Debug, Clone)]
pub struct VerifiedToken(pub String);

/// A gateway request filter.
///
/// One capability, no lifecycle hooks: inspect the request, return at most
/// one decision. Returning `None` passes the request through untouched.
#[async_trait]
pub trait RequestFilter: Send + Sync {
    async fn decide(&self, parts: &Parts, config: &FilterConfig) -> Option<AuthOutcome>;
}

/// The JWT authentication filter.
pub struct AuthenticationFilter {
    verifier: JwtVerifier,
    consumers: Arc<ConsumerResolver>,
}

impl AuthenticationFilter {
    pub fn new(secrets: Arc<SecretResolver>, consumers: Arc<ConsumerResolver>) -> Self {
        Self {
            verifier: JwtVerifier::new(secrets),
            consumers,
        }
    }

    /// Locate, verify, and map the credential to its owning consumer.
    #[instrument(skip_all, fields(method = %parts.method))]
    async fn authenticate(
        &self,
        parts: &Parts,
        config: &FilterConfig,
    ) -> Result<(Arc<Consumer>, Arc<JwtSecret>, String), AuthError> {
        let token = match locator::locate(parts, config)? {
            Located::None => return Err(AuthError::NoToken),
            Located::Multiple => return Err(AuthError::MultipleTokens),
            Located::Single(token) => token,
        };

        let (_claims, credential) = self.verifier.verify(&token, config).await?;

        let consumer = self
            .consumers
            .resolve(credential.consumer_id)
            .await?
            .ok_or_else(|| AuthError::ConsumerNotFound {
                key_claim_name: config.key_claim_name.clone(),
                key: credential.key.clone(),
            })?;

        Ok((consumer, credential, token))
    }

    /// Resolve the configured anonymous consumer.
    ///
    /// A store failure here is still fatal, and a configured-but-missing
    /// consumer is operator error, not a caller rejection.
    async fn anonymous_fallback(&self, anonymous_id: Uuid) -> Result<Arc<Consumer>, AuthError> {
        self.consumers
            .resolve(anonymous_id)
            .await?
            .ok_or(AuthError::AnonymousNotFound(anonymous_id))
    }

    fn reject(err: AuthError) -> Option<AuthOutcome> {
        tracing::debug!(
            code = err.error_code(),
            status = err.status_code().as_u16(),
            "authentication rejected"
        );
        record_token_validation("error", Some(err.category()));
        record_auth_decision("rejected");
        Some(AuthOutcome::Rejected(err))
    }
}

#[async_trait]
impl RequestFilter for AuthenticationFilter {
    async fn decide(&self, parts: &Parts, config: &FilterConfig) -> Option<AuthOutcome> {
        // Preflight requests carry no credentials by design
        if parts.method == Method::OPTIONS && !config.run_on_preflight {
            return None;
        }

        // OR-chained authentication: once an earlier filter in an
        // anonymous-enabled chain has verified a credential, later methods
        // stand down. Without anonymous chaining every filter must pass.
        if config.anonymous.is_some()
            && parts.extensions.get::<AuthenticatedCredential>().is_some()
        {
            return None;
        }

        match self.authenticate(parts, config).await {
            Ok((consumer, credential, token)) => {
                record_token_validation("success", None);
                record_auth_decision("authenticated");
                Some(AuthOutcome::Authenticated {
                    consumer,
                    credential,
                    token,
                })
            }
            Err(err) if !err.token_was_located() => {
                // No credential was supplied. Only here is anonymous
                // fallback legal: a request that carried a token, however
                // broken, is always rejected on its own terms.
                match config.anonymous {
                    Some(anonymous_id) => match self.anonymous_fallback(anonymous_id).await {
                        Ok(consumer) => {
                            record_auth_decision("anonymous");
                            Some(AuthOutcome::AnonymousFallback { consumer })
                        }
                        Err(fallback_err) => Self::reject(fallback_err),
                    },
                    None => Self::reject(err),
                }
            }
            Err(err) => Self::reject(err),
        }
    }
}
