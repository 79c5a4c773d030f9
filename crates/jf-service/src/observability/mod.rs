//! Observability module for the JWT filter service.
//!
//! Metrics only; distributed tracing spans come from `tracing` +
//! `#[instrument]` at the call sites.
//!
//! # Privacy by Default
//!
//! Instrumentation uses `#[instrument(skip_all)]` with explicit safe-field
//! allow-listing. Tokens, signing secrets, and decoded claims never appear
//! in metric labels or log fields; lookup keys appear only at DEBUG level.

pub mod metrics;
