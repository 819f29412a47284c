/// Error taxonomy for project database access
///
/// - Not configured: not an error, surfaced as `None` / empty results
/// - `ExplorerError::Connection`: network/auth/unknown database/unknown host
/// - `IntrospectionError`: best-effort catalog lookups, swallowed at the introspector boundary
/// - `ExplorerError::Query`: a data query failed after connecting
///
/// Variants keep the raw driver text for logging. Only `public_message` may
/// be shown to a user.

pub mod sanitize;

use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

pub use sanitize::sanitize;

/// MySQL error numbers raised while establishing a session
const CONNECT_PHASE_CODES: [u16; 8] = [1044, 1045, 1049, 2002, 2003, 2005, 2006, 2013];

/// Failures of connection and data operations against a project database
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Could not reach or authenticate against the target
    #[error("connection failed: {0}")]
    Connection(String),

    /// A data query failed after the connection succeeded
    #[error("query failed: {0}")]
    Query(String),

    /// A statement exceeded the configured timeout
    #[error("query timed out after {0}ms")]
    Timeout(u64),

    /// The project names a driver this engine cannot speak
    #[error("unsupported database driver: {0}")]
    UnsupportedDriver(String),

    /// The caller asked for an impossible page window
    #[error("invalid page request: {0}")]
    InvalidPage(String),
}

/// Failure of a best-effort catalog lookup (primary key, foreign keys)
#[derive(Error, Debug)]
pub enum IntrospectionError {
    #[error("catalog query failed: {0}")]
    Catalog(String),
}

impl From<sqlx::Error> for IntrospectionError {
    fn from(err: sqlx::Error) -> Self {
        IntrospectionError::Catalog(err.to_string())
    }
}

impl From<ExplorerError> for IntrospectionError {
    fn from(err: ExplorerError) -> Self {
        IntrospectionError::Catalog(err.to_string())
    }
}

impl From<sqlx::Error> for ExplorerError {
    fn from(err: sqlx::Error) -> Self {
        let raw = err.to_string();
        if is_connection_error(&err) {
            ExplorerError::Connection(raw)
        } else {
            ExplorerError::Query(raw)
        }
    }
}

impl ExplorerError {
    /// Categorical message that is safe to show to a user
    pub fn public_message(&self) -> String {
        match self {
            ExplorerError::Connection(raw) => sanitize(raw).to_string(),
            ExplorerError::Query(_) => "Database query failed".to_string(),
            ExplorerError::Timeout(_) => "Database query timed out".to_string(),
            ExplorerError::UnsupportedDriver(driver) => {
                format!("Unsupported database driver: {}", driver)
            }
            ExplorerError::InvalidPage(_) => "Invalid page request".to_string(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ExplorerError::Connection(_))
    }
}

fn is_connection_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Protocol(_)
        | sqlx::Error::Configuration(_) => true,
        sqlx::Error::Database(db) => match db.try_downcast_ref::<MySqlDatabaseError>() {
            Some(mysql) => CONNECT_PHASE_CODES.contains(&mysql.number()),
            None => db.message().contains("unable to open database file"),
        },
        _ => false,
    }
}
