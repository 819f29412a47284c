/// Server setup and initialization
///
/// Wires together the host storage, explorer settings and HTTP routes.
/// Project databases are never opened here: every request opens and closes
/// its own scope.

use crate::{
    api::{create_project_routes, create_table_routes, AppState},
    config::Config,
    project::ProjectStorage,
};
use anyhow::Result;
use axum::{routing::get, Router};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use tokio::net::TcpListener;

/// Create the main Axum application with all routes
///
/// Ensures the data directory exists, opens the host's own project store
/// and builds the router on top of it.
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("📁 Ensuring data directory exists: {}", config.database.data_dir);
    std::fs::create_dir_all(&config.database.data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory: {}", e))?;

    let db_path = Path::new(&config.database.data_dir).join("projects.db");
    tracing::info!("📋 Initializing project storage at {}", db_path.display());
    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open project storage: {}", e))?;

    let storage = ProjectStorage::new(pool);
    storage
        .init_schema()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize project storage: {}", e))?;

    let state = AppState {
        storage,
        settings: config.explorer.clone(),
    };

    let app = create_router(state);
    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Build the HTTP router over an existing application state
pub fn create_router(state: AppState) -> Router {
    tracing::info!("📡 Creating HTTP router with all endpoints");
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Project registration and connection tests
        .merge(create_project_routes().with_state(state.clone()))
        // Table browsing, records, users and feedback views
        .merge(create_table_routes().with_state(state))
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Tablescope server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "ok"
}
