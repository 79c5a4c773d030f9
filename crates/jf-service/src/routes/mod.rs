use crate::middleware::auth::{jwt_auth, AuthFilterState};
use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::future::ready;
use tower_http::trace::TraceLayer;

/// Assemble the service router.
///
/// The `upstream` router is whatever the gateway dispatches authenticated
/// traffic into; every one of its routes runs behind the filter. The
/// operational endpoints (`/health`, `/metrics`) sit outside the filter so
/// probes and scrapes need no credentials.
pub fn build_routes(
    state: AuthFilterState,
    upstream: Router,
    prometheus_handle: Option<PrometheusHandle>,
) -> Router {
    let mut router = upstream
        .layer(middleware::from_fn_with_state(state, jwt_auth))
        .route("/health", get(health_check));

    if let Some(handle) = prometheus_handle {
        router = router.route("/metrics", get(move || ready(handle.render())));
    }

    router.layer(TraceLayer::new_for_http())
}

/// Fallback upstream for a filter deployed without a dispatch target.
pub fn unconfigured_upstream() -> Router {
    Router::new().fallback(no_upstream)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn no_upstream() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "error": {
                "code": "NO_UPSTREAM",
                "message": "No upstream is configured for this route"
            }
        })),
    )
}
