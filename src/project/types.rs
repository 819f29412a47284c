/// Project type definitions for multi-tenant database browsing
///
/// A project owns zero-or-one external database target. The descriptor is
/// written by project management and read-only to the explorer.

use crate::error::ExplorerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tenant's registered database target plus browsing preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier; namespaces the connection registry
    #[serde(default)]
    pub id: String,
    /// Human-readable project name
    #[serde(default)]
    pub name: String,
    /// Driver name ("mysql", "mariadb", "sqlite")
    #[serde(default)]
    pub db_driver: String,
    #[serde(default)]
    pub db_host: String,
    #[serde(default)]
    pub db_port: Option<u16>,
    /// Database (schema) name, or file path for sqlite
    #[serde(default)]
    pub db_database: String,
    #[serde(default)]
    pub db_username: String,
    #[serde(default)]
    pub db_password: String,
    /// Custom table backing the users view (default: "users")
    #[serde(default)]
    pub users_table: Option<String>,
    /// Custom table backing the feedback view (no default)
    #[serde(default)]
    pub feedbacks_table: Option<String>,
    /// User-curated table shortcuts, in display order
    #[serde(default)]
    pub pinned_tables: Vec<String>,
}

impl Project {
    /// Whether the connection descriptor is complete
    ///
    /// Partial descriptors are treated as "no database configured".
    pub fn has_database(&self) -> bool {
        [
            &self.db_driver,
            &self.db_host,
            &self.db_database,
            &self.db_username,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Registry key for this project's connection
    pub fn connection_name(&self) -> String {
        format!("project_{}", self.id)
    }

    pub fn users_table_name(&self) -> &str {
        non_empty(self.users_table.as_deref()).unwrap_or("users")
    }

    pub fn feedbacks_table_name(&self) -> Option<&str> {
        non_empty(self.feedbacks_table.as_deref())
    }

    /// Credential-free projection for listings
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            driver: self.db_driver.clone(),
            host: self.db_host.clone(),
            port: self.db_port,
            database: self.db_database.clone(),
            has_database: self.has_database(),
            users_table: self.users_table_name().to_string(),
            feedbacks_table: self.feedbacks_table_name().map(str::to_string),
            pinned_tables: self.pinned_tables.clone(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Project as exposed over the API; never carries credentials
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub host: String,
    pub port: Option<u16>,
    pub database: String,
    pub has_database: bool,
    pub users_table: String,
    pub feedbacks_table: Option<String>,
    pub pinned_tables: Vec<String>,
}

/// Wire protocols the engine can speak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    MySql,
    Sqlite,
}

impl DatabaseDriver {
    pub fn parse(name: &str) -> Result<Self, ExplorerError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DatabaseDriver::MySql),
            "sqlite" => Ok(DatabaseDriver::Sqlite),
            other => Err(ExplorerError::UnsupportedDriver(other.to_string())),
        }
    }

    /// Port used when the project leaves it blank
    pub fn default_port(&self) -> Option<u16> {
        match self {
            DatabaseDriver::MySql => Some(3306),
            DatabaseDriver::Sqlite => None,
        }
    }
}

impl fmt::Display for DatabaseDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseDriver::MySql => write!(f, "mysql"),
            DatabaseDriver::Sqlite => write!(f, "sqlite"),
        }
    }
}
