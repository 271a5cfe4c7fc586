/// Server setup and initialization
/// 
/// Wires together the catalog storage, HTTP routes and middleware.
/// Provides the main application factory function for creating the Axum app.

use crate::{
    api::{create_workflow_routes, AppState},
    catalog::CatalogStorage,
    config::Config,
};
use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
/// 
/// Log level defaults to `info` and can be overridden with `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();
}

/// Create the main Axum application with all routes and middleware
/// 
/// Opens the catalog database at the configured path and builds the router.
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("🗄️ Initializing catalog storage");
    let storage = CatalogStorage::connect(&config.database.path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open catalog database: {}", e))?;

    let app = build_router(storage, &config.server.cors_origin)?;

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Build the HTTP router over an already opened catalog
pub fn build_router(storage: CatalogStorage, cors_origin: &str) -> Result<Router> {
    let origin: HeaderValue = cors_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", cors_origin, e))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app_state = AppState { storage };

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Catalog API routes
        .merge(create_workflow_routes().with_state(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Start the HTTP server with the given configuration
/// 
/// Creates the application and starts the Axum server on the configured address and port.
pub async fn start_server(config: Config) -> Result<()> {
    tracing::info!("Starting AutoFlow Hub API...");

    let app = create_app(config.clone()).await?;

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("🚀 AutoFlow Hub API running on http://{}", bind_addr);
    tracing::info!("📊 Health check: http://{}/health", bind_addr);
    tracing::info!("🔗 API endpoints: http://{}/api/workflows", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "AutoFlow Hub API is running" }))
}
