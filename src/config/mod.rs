/// Configuration management for Tablescope
///
/// Handles server configuration, the host application's own storage, and the
/// limits applied to every tenant database connection.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Host storage configuration
    pub database: DatabaseConfig,
    /// Limits for project (tenant) database access
    pub explorer: ExplorerSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Host application storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the host's own SQLite store (default: "data")
    /// Creates: {data_dir}/projects.db
    pub data_dir: String,
}

/// Limits applied to connections opened against project databases
///
/// The reader never caps page sizes itself; `max_page_size` is enforced by
/// the HTTP layer before a request reaches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerSettings {
    /// Page size used when the caller does not ask for one
    pub default_page_size: u32,
    /// Upper bound the HTTP layer clamps requested page sizes to
    pub max_page_size: u32,
    /// Per-statement timeout in milliseconds
    pub statement_timeout_ms: u64,
    /// Pool acquire (connect + handshake) timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Pool size for a single project handle
    pub max_connections: u32,
}

impl ExplorerSettings {
    pub fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Clamp a requested page size into `1..=max_page_size`
    pub fn clamp_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            default_page_size: env_or("TABLESCOPE_PAGE_SIZE", 15),
            max_page_size: env_or("TABLESCOPE_MAX_PAGE_SIZE", 100),
            statement_timeout_ms: env_or("TABLESCOPE_STATEMENT_TIMEOUT_MS", 10_000),
            connect_timeout_ms: env_or("TABLESCOPE_CONNECT_TIMEOUT_MS", 5_000),
            max_connections: env_or("TABLESCOPE_MAX_CONNECTIONS", 2),
        }
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for k8s/container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("TABLESCOPE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("TABLESCOPE_PORT", 3005),
            },
            database: DatabaseConfig {
                data_dir: std::env::var("TABLESCOPE_DATA_DIR")
                    .unwrap_or_else(|_| "data".to_string()),
            },
            explorer: ExplorerSettings::default(),
        }
    }
}

/// Read and parse an environment variable, falling back on absence or parse failure
fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(fallback)
}
