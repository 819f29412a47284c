/// Live handles to project databases
///
/// Each driver implements `DatabaseHandle`, the seam between the generic
/// introspection/reading logic and a concrete wire protocol:
/// - `mysql`: MySQL / MariaDB via sqlx
/// - `sqlite`: SQLite database files via sqlx

pub mod mysql;
pub mod sqlite;

use crate::config::ExplorerSettings;
use crate::data::{Row, RowOrder};
use crate::error::{ExplorerError, IntrospectionError};
use crate::project::types::{DatabaseDriver, Project};
use crate::schema::ForeignKeyMap;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use mysql::MySqlHandle;
pub use sqlite::SqliteHandle;

/// A named, live link to one project's database
///
/// Catalog lookups that are best-effort return `IntrospectionError`; the
/// caller decides what to default to.
#[async_trait]
pub trait DatabaseHandle: Send + Sync {
    /// Registry name (`project_{id}`) this handle was opened under
    fn connection_name(&self) -> &str;

    fn driver(&self) -> DatabaseDriver;

    /// Open a connection and complete the handshake without issuing a query
    async fn ping(&self) -> Result<(), ExplorerError>;

    /// Tables of the selected database, exactly as the catalog reports them
    async fn table_names(&self) -> Result<Vec<String>, ExplorerError>;

    /// Column names in declared order
    async fn column_names(&self, table: &str) -> Result<Vec<String>, ExplorerError>;

    async fn count_rows(&self, table: &str) -> Result<u64, ExplorerError>;

    async fn primary_key_column(&self, table: &str) -> Result<Option<String>, IntrospectionError>;

    /// Formal foreign-key constraints declared on `table`
    async fn declared_foreign_keys(&self, table: &str) -> Result<ForeignKeyMap, IntrospectionError>;

    async fn fetch_rows(
        &self,
        table: &str,
        order: &RowOrder,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Row>, ExplorerError>;

    async fn fetch_first(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Option<Row>, ExplorerError>;

    /// Release every pooled connection
    async fn close(&self);
}

/// Build a handle for a project with a complete descriptor
///
/// No I/O happens here; the first statement opens the first connection.
pub fn open(
    project: &Project,
    settings: &ExplorerSettings,
) -> Result<Arc<dyn DatabaseHandle>, ExplorerError> {
    let handle: Arc<dyn DatabaseHandle> = match DatabaseDriver::parse(&project.db_driver)? {
        DatabaseDriver::MySql => Arc::new(MySqlHandle::open(project, settings)),
        DatabaseDriver::Sqlite => Arc::new(SqliteHandle::open(project, settings)),
    };
    Ok(handle)
}

/// Run a statement under the configured timeout
pub(crate) async fn bounded<T, F>(timeout: Duration, statement: F) -> Result<T, ExplorerError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, statement).await {
        Ok(result) => result.map_err(ExplorerError::from),
        Err(_) => Err(ExplorerError::Timeout(
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bounded_times_out() {
        let result: Result<(), ExplorerError> = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(ExplorerError::Timeout(10))));
    }

    #[tokio::test]
    async fn bounded_maps_driver_errors() {
        let result: Result<(), ExplorerError> =
            bounded(Duration::from_secs(1), async { Err(sqlx::Error::PoolClosed) }).await;
        assert!(matches!(result, Err(ExplorerError::Connection(_))));
    }

    #[test]
    fn unknown_drivers_are_rejected() {
        let project = Project {
            id: "1".to_string(),
            db_driver: "mssql".to_string(),
            db_host: "h".to_string(),
            db_database: "d".to_string(),
            db_username: "u".to_string(),
            ..Project::default()
        };
        let settings = ExplorerSettings {
            default_page_size: 15,
            max_page_size: 100,
            statement_timeout_ms: 1_000,
            connect_timeout_ms: 1_000,
            max_connections: 1,
        };
        assert!(matches!(
            open(&project, &settings),
            Err(ExplorerError::UnsupportedDriver(_))
        ));
    }
}
