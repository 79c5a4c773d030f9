use jf_service::config::Config;
use jf_service::filter::{AuthenticationFilter, RequestFilter};
use jf_service::middleware::auth::AuthFilterState;
use jf_service::resolvers::{
    ConsumerResolver, PgConsumerStore, PgSecretStore, SecretResolver,
};
use jf_service::routes;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jf_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JWT Filter");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    // Initialize Prometheus metrics recorder before any metrics are recorded
    info!("Initializing Prometheus metrics recorder...");
    let prometheus_handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        error!(error = %e, "Failed to install Prometheus metrics recorder");
        format!("Failed to install Prometheus metrics recorder: {e}")
    })?;

    // Initialize database connection pool
    info!("Connecting to database...");
    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    info!("Database connection established");

    // Wire the resolvers and the filter; the resolvers own the only
    // cross-request shared state (the single-flight caches)
    let secrets = Arc::new(SecretResolver::new(Arc::new(PgSecretStore::new(
        db_pool.clone(),
    ))));
    let consumers = Arc::new(ConsumerResolver::new(Arc::new(PgConsumerStore::new(
        db_pool,
    ))));
    let filter: Arc<dyn RequestFilter> = Arc::new(AuthenticationFilter::new(secrets, consumers));

    let state = AuthFilterState {
        filter,
        config: Arc::new(config.filter.clone()),
    };

    // Build application routes
    let app = routes::build_routes(state, routes::unconfigured_upstream(), Some(prometheus_handle));

    // Parse bind address
    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("JWT Filter listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
