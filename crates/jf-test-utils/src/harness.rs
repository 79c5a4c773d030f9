//! In-process harness for end-to-end filter tests.
//!
//! Builds the real service router (filter middleware included) over
//! in-memory stores, with an upstream double that echoes the headers it
//! received, so tests can assert exactly what identity the filter
//! forwarded without a network or a database.

use crate::stores::{MemoryConsumerStore, MemorySecretStore};
use axum::{
    body::Body,
    extract::Request,
    response::Response,
    Json, Router,
};
use http_body_util::BodyExt;
use jf_service::config::FilterConfig;
use jf_service::filter::{AuthenticatedConsumer, AuthenticatedCredential, AuthenticationFilter, RequestFilter, VerifiedToken};
use jf_service::middleware::auth::AuthFilterState;
use jf_service::models::{Consumer, JwtSecret};
use jf_service::resolvers::{ConsumerResolver, ConsumerStore, SecretResolver, SecretStore};
use jf_service::routes::build_routes;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Marker keys the echo upstream injects alongside the echoed headers.
pub const ECHO_HAS_CREDENTIAL: &str = "__has_credential";
pub const ECHO_HAS_CONSUMER: &str = "__has_consumer";
pub const ECHO_HAS_TOKEN: &str = "__has_token";

/// A built filter service over in-memory stores.
pub struct FilterHarness {
    router: Router,
    pub secret_store: Arc<MemorySecretStore>,
    pub consumer_store: Arc<MemoryConsumerStore>,
}

pub struct FilterHarnessBuilder {
    config: FilterConfig,
    secrets: Vec<JwtSecret>,
    consumers: Vec<Consumer>,
}

impl FilterHarness {
    pub fn builder() -> FilterHarnessBuilder {
        FilterHarnessBuilder {
            config: FilterConfig::default(),
            secrets: Vec::new(),
            consumers: Vec::new(),
        }
    }

    /// Drive one request through the full router.
    pub async fn oneshot(&self, request: Request) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
    }

    pub async fn get_with_bearer(&self, uri: &str, token: &str) -> Response {
        self.oneshot(
            Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
    }
}

impl FilterHarnessBuilder {
    pub fn with_config(mut self, config: FilterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_secret(mut self, secret: JwtSecret) -> Self {
        self.secrets.push(secret);
        self
    }

    pub fn with_consumer(mut self, consumer: Consumer) -> Self {
        self.consumers.push(consumer);
        self
    }

    pub fn build(self) -> FilterHarness {
        let secret_store = Arc::new(MemorySecretStore::new());
        for secret in self.secrets {
            secret_store.insert(secret);
        }
        let consumer_store = Arc::new(MemoryConsumerStore::new());
        for consumer in self.consumers {
            consumer_store.insert(consumer);
        }

        let secrets = Arc::new(SecretResolver::new(
            Arc::clone(&secret_store) as Arc<dyn SecretStore>
        ));
        let consumers = Arc::new(ConsumerResolver::new(
            Arc::clone(&consumer_store) as Arc<dyn ConsumerStore>,
        ));
        let filter: Arc<dyn RequestFilter> =
            Arc::new(AuthenticationFilter::new(secrets, consumers));

        let state = AuthFilterState {
            filter,
            config: Arc::new(self.config),
        };
        let upstream = Router::new().fallback(echo_headers);
        let router = build_routes(state, upstream, None);

        FilterHarness {
            router,
            secret_store,
            consumer_store,
        }
    }
}

/// Upstream double: echoes the received request headers (and which
/// identity extensions were attached) back as a JSON object.
async fn echo_headers(req: Request) -> Json<Value> {
    let mut echoed = Map::new();
    for (name, value) in req.headers() {
        if let Ok(value) = value.to_str() {
            echoed.insert(name.as_str().to_string(), json!(value));
        }
    }
    echoed.insert(
        ECHO_HAS_CREDENTIAL.to_string(),
        json!(req.extensions().get::<AuthenticatedCredential>().is_some()),
    );
    echoed.insert(
        ECHO_HAS_CONSUMER.to_string(),
        json!(req.extensions().get::<AuthenticatedConsumer>().is_some()),
    );
    echoed.insert(
        ECHO_HAS_TOKEN.to_string(),
        json!(req.extensions().get::<VerifiedToken>().is_some()),
    );
    Json(Value::Object(echoed))
}

/// Collect a response body as JSON.
pub async fn json_body(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}
