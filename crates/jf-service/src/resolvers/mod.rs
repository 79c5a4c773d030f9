//! Single-flight cached resolution of credentials and consumers.
//!
//! Both resolvers wrap a backing store with an in-memory cache using
//! get-or-load semantics: under concurrent callers sharing a key, exactly
//! one load is issued to the store and every waiter observes the same
//! resolved value or the same error.
//!
//! # Cache Strategy
//!
//! - Resolved values (including genuine not-found) are cached with a TTL
//!   and survive across requests until expiry or external invalidation.
//! - Store errors are shared with in-flight waiters but never cached, so
//!   the next request retries the store.
//! - This layer performs no retries itself; a store failure is fatal for
//!   the requests that observe it.

use crate::errors::AuthError;
use crate::models::{Consumer, JwtSecret};
use crate::observability::metrics::{record_resolver_lookup, record_store_lookup};
use crate::repositories;
use async_trait::async_trait;
use moka::future::Cache;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Default TTL for cached resolutions (5 minutes).
///
/// Bounds how long a deleted credential or consumer keeps authenticating
/// after removal from the store, while keeping steady-state traffic off
/// the database.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default maximum cache capacity (per resolver).
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Backing store for JWT credentials, keyed by the token-carried lookup key.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_by_key(&self, key: &str) -> Result<Option<JwtSecret>, AuthError>;
}

/// Backing store for consumers, keyed by id.
#[async_trait]
pub trait ConsumerStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Consumer>, AuthError>;
}

/// Postgres-backed credential store.
pub struct PgSecretStore {
    pool: PgPool,
}

impl PgSecretStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecretStore for PgSecretStore {
    async fn get_by_key(&self, key: &str) -> Result<Option<JwtSecret>, AuthError> {
        repositories::jwt_secrets::get_by_key(&self.pool, key).await
    }
}

/// Postgres-backed consumer store.
pub struct PgConsumerStore {
    pool: PgPool,
}

impl PgConsumerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConsumerStore for PgConsumerStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Consumer>, AuthError> {
        repositories::consumers::get_by_id(&self.pool, id).await
    }
}

/// Rebuild the error every waiter of a failed load receives.
///
/// The cache hands waiters a shared `Arc<AuthError>`; callers expect an
/// owned error, and store failures are all `Database`, so cloning the
/// message is lossless.
fn shared_store_error(err: &AuthError) -> AuthError {
    match err {
        AuthError::Database(msg) => AuthError::Database(msg.clone()),
        other => AuthError::Database(other.to_string()),
    }
}

/// Single-flight cache over a [`SecretStore`].
pub struct SecretResolver {
    cache: Cache<String, Option<Arc<JwtSecret>>>,
    store: Arc<dyn SecretStore>,
}

impl SecretResolver {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self::with_cache(store, DEFAULT_CACHE_TTL, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache(store: Arc<dyn SecretStore>, ttl: Duration, capacity: u64) -> Self {
        Self {
            cache: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(capacity)
                .build(),
            store,
        }
    }

    /// Resolve a credential by lookup key.
    ///
    /// `Ok(None)` is a genuine not-found, which the verifier maps to a
    /// rejection; `Err` is a store failure and stays fatal.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, key: &str) -> Result<Option<Arc<JwtSecret>>, AuthError> {
        if let Some(cached) = self.cache.get(key).await {
            record_resolver_lookup("secret", "hit");
            return Ok(cached);
        }

        // Miss: join (or start) the single flight for this key. Concurrent
        // callers that also missed share one store load.
        let store = Arc::clone(&self.store);
        let load_key = key.to_string();
        let result = self
            .cache
            .try_get_with(key.to_string(), async move {
                let start = Instant::now();
                let loaded = store.get_by_key(&load_key).await;
                let status = if loaded.is_ok() { "success" } else { "error" };
                record_store_lookup("jwt_secrets", status, start.elapsed());
                loaded.map(|secret| secret.map(Arc::new))
            })
            .await;

        match result {
            Ok(resolved) => {
                let outcome = if resolved.is_some() { "miss" } else { "negative" };
                record_resolver_lookup("secret", outcome);
                Ok(resolved)
            }
            Err(shared) => {
                record_resolver_lookup("secret", "error");
                Err(shared_store_error(&shared))
            }
        }
    }

    /// Drop a cached resolution so the next lookup refetches.
    ///
    /// Call when a credential is known to have changed or been revoked.
    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

/// Single-flight cache over a [`ConsumerStore`].
pub struct ConsumerResolver {
    cache: Cache<Uuid, Option<Arc<Consumer>>>,
    store: Arc<dyn ConsumerStore>,
}

impl ConsumerResolver {
    pub fn new(store: Arc<dyn ConsumerStore>) -> Self {
        Self::with_cache(store, DEFAULT_CACHE_TTL, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache(store: Arc<dyn ConsumerStore>, ttl: Duration, capacity: u64) -> Self {
        Self {
            cache: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(capacity)
                .build(),
            store,
        }
    }

    /// Resolve a consumer by id.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, id: Uuid) -> Result<Option<Arc<Consumer>>, AuthError> {
        if let Some(cached) = self.cache.get(&id).await {
            record_resolver_lookup("consumer", "hit");
            return Ok(cached);
        }

        let store = Arc::clone(&self.store);
        let result = self
            .cache
            .try_get_with(id, async move {
                let start = Instant::now();
                let loaded = store.get_by_id(id).await;
                let status = if loaded.is_ok() { "success" } else { "error" };
                record_store_lookup("consumers", status, start.elapsed());
                loaded.map(|consumer| consumer.map(Arc::new))
            })
            .await;

        match result {
            Ok(resolved) => {
                let outcome = if resolved.is_some() { "miss" } else { "negative" };
                record_resolver_lookup("consumer", outcome);
                Ok(resolved)
            }
            Err(shared) => {
                record_resolver_lookup("consumer", "error");
                Err(shared_store_error(&shared))
            }
        }
    }

    pub async fn invalidate(&self, id: Uuid) {
        self.cache.invalidate(&id).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
