//! In-memory store doubles for the resolver traits.
//!
//! Both stores count their loads (for single-flight assertions) and can be
//! switched into a failing mode (for fatal-error-path tests).

use async_trait::async_trait;
use jf_service::errors::AuthError;
use jf_service::models::{Consumer, JwtSecret};
use jf_service::resolvers::{ConsumerStore, SecretStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory [`SecretStore`].
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<String, JwtSecret>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, secret: JwtSecret) {
        self.secrets
            .lock()
            .expect("secret store lock")
            .insert(secret.key.clone(), secret);
    }

    /// Number of loads issued to this store.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent load fail with a store error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_by_key(&self, key: &str) -> Result<Option<JwtSecret>, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AuthError::Database(
                "injected secret store failure".to_string(),
            ));
        }
        Ok(self.secrets.lock().expect("secret store lock").get(key).cloned())
    }
}

/// In-memory [`ConsumerStore`].
#[derive(Default)]
pub struct MemoryConsumerStore {
    consumers: Mutex<HashMap<Uuid, Consumer>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryConsumerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, consumer: Consumer) {
        self.consumers
            .lock()
            .expect("consumer store lock")
            .insert(consumer.id, consumer);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConsumerStore for MemoryConsumerStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Consumer>, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AuthError::Database(
                "injected consumer store failure".to_string(),
            ));
        }
        Ok(self
            .consumers
            .lock()
            .expect("consumer store lock")
            .get(&id)
            .cloned())
    }
}
