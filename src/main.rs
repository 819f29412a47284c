/// Tablescope server entry point
///
/// Loads configuration from the environment and starts the HTTP server.

use tablescope::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Project registration at /api/projects/*
/// - Table browsing at /api/projects/{id}/tables/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Defaults to 0.0.0.0:3005 with the project store under ./data
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
