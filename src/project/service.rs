/// Project database facade
///
/// One `ProjectDatabase` is one request/operation scope: it owns its own
/// connection registry, opens the project's handle lazily, and releases it in
/// `close`. A project without a complete descriptor yields empty results,
/// never errors.

use crate::config::ExplorerSettings;
use crate::connection::DatabaseHandle;
use crate::data::{reader, Page, PageRequest, Row, RowOrder};
use crate::error::{sanitize, ExplorerError};
use crate::project::registry::ConnectionRegistry;
use crate::project::types::Project;
use crate::schema::{introspector, ForeignKeyMap, TableSchema};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const NOT_CONFIGURED_MESSAGE: &str = "No database configuration provided";

/// Outcome of a connection test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    /// Sanitized reason; never raw driver text
    pub error: Option<String>,
}

impl ConnectionStatus {
    fn connected() -> Self {
        Self {
            connected: true,
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            connected: false,
            error: Some(message.into()),
        }
    }
}

/// Navigation target for a foreign-key value on a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyLink {
    pub table: String,
    pub column: String,
    pub value: String,
}

/// A single record with the schema needed to render and navigate it
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub table: String,
    pub record_id: String,
    pub record: Row,
    pub columns: Vec<String>,
    pub primary_key: String,
    pub foreign_keys: ForeignKeyMap,
    /// FK columns holding a non-null value, resolved to their target
    pub links: BTreeMap<String, ForeignKeyLink>,
}

/// Resolve the record's foreign-key values into navigation links
pub fn resolve_links(record: &Row, foreign_keys: &ForeignKeyMap) -> BTreeMap<String, ForeignKeyLink> {
    foreign_keys
        .iter()
        .filter_map(|(column, target)| {
            let value = record.get(column)?.as_link_value()?;
            Some((
                column.clone(),
                ForeignKeyLink {
                    table: target.table.clone(),
                    column: target.column.clone(),
                    value,
                },
            ))
        })
        .collect()
}

/// Database access for one project, scoped to one request
pub struct ProjectDatabase {
    project: Project,
    registry: ConnectionRegistry,
}

impl ProjectDatabase {
    pub fn new(project: Project, settings: ExplorerSettings) -> Self {
        Self::with_registry(project, ConnectionRegistry::new(settings))
    }

    pub fn with_registry(project: Project, registry: ConnectionRegistry) -> Self {
        Self { project, registry }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn has_database(&self) -> bool {
        self.project.has_database()
    }

    /// Obtain (or reuse) this scope's handle
    pub async fn connect(&self) -> Result<Option<Arc<dyn DatabaseHandle>>, ExplorerError> {
        self.registry.connect(&self.project).await
    }

    /// Release this scope's handle; safe when nothing was opened
    pub async fn disconnect(&self) {
        self.registry.disconnect(&self.project).await;
    }

    /// End of scope
    pub async fn close(self) {
        self.registry.disconnect_all().await;
    }

    /// Connect and complete a handshake, reporting only sanitized errors
    pub async fn test_connection(&self) -> ConnectionStatus {
        let handle = match self.connect().await {
            Ok(Some(handle)) => handle,
            Ok(None) => return ConnectionStatus::failed(NOT_CONFIGURED_MESSAGE),
            Err(e @ ExplorerError::UnsupportedDriver(_)) => {
                return ConnectionStatus::failed(e.public_message())
            }
            Err(e) => {
                tracing::warn!("⚠️ Connection test for project {} failed: {}", self.project.id, e);
                return ConnectionStatus::failed(sanitize(&e.to_string()));
            }
        };

        match handle.ping().await {
            Ok(()) => {
                tracing::info!("✅ Connection test for project {} succeeded", self.project.id);
                ConnectionStatus::connected()
            }
            Err(e) => {
                tracing::warn!("⚠️ Connection test for project {} failed: {}", self.project.id, e);
                ConnectionStatus::failed(sanitize(&e.to_string()))
            }
        }
    }

    pub async fn tables(&self) -> Result<Vec<String>, ExplorerError> {
        match self.connect().await? {
            Some(handle) => introspector::list_tables(handle.as_ref()).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn has_table(&self, table: &str) -> Result<bool, ExplorerError> {
        Ok(self.tables().await?.iter().any(|t| t == table))
    }

    /// Pinned tables that still exist, in the user's order
    pub async fn pinned_tables(&self) -> Result<Vec<String>, ExplorerError> {
        let live = self.tables().await?;
        Ok(pinned_among(&self.project.pinned_tables, &live))
    }

    pub async fn table_columns(&self, table: &str) -> Result<Vec<String>, ExplorerError> {
        match self.connect().await? {
            Some(handle) => introspector::list_columns(handle.as_ref(), table).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn table_row_count(&self, table: &str) -> Result<u64, ExplorerError> {
        match self.connect().await? {
            Some(handle) => introspector::row_count(handle.as_ref(), table).await,
            None => Ok(0),
        }
    }

    /// `None` only when no database is configured
    pub async fn primary_key(&self, table: &str) -> Result<Option<String>, ExplorerError> {
        match self.connect().await? {
            Some(handle) => Ok(Some(introspector::primary_key(handle.as_ref(), table).await)),
            None => Ok(None),
        }
    }

    pub async fn foreign_keys(&self, table: &str) -> Result<ForeignKeyMap, ExplorerError> {
        match self.connect().await? {
            Some(handle) => introspector::foreign_keys(handle.as_ref(), table).await,
            None => Ok(ForeignKeyMap::new()),
        }
    }

    /// `None` only when no database is configured
    pub async fn table_schema(&self, table: &str) -> Result<Option<TableSchema>, ExplorerError> {
        match self.connect().await? {
            Some(handle) => Ok(Some(introspector::describe_table(handle.as_ref(), table).await?)),
            None => Ok(None),
        }
    }

    /// Generic table browsing in storage order
    pub async fn table_page(&self, table: &str, request: PageRequest) -> Result<Page, ExplorerError> {
        self.read_page(table, request, &RowOrder::Natural).await
    }

    /// Record by primary-key value, with resolved foreign-key links
    pub async fn record(&self, table: &str, id: &str) -> Result<Option<RecordView>, ExplorerError> {
        let Some(handle) = self.connect().await? else {
            return Ok(None);
        };

        let schema = introspector::describe_table(handle.as_ref(), table).await?;
        let Some(record) = reader::get_one(handle.as_ref(), table, &schema.primary_key, id).await?
        else {
            return Ok(None);
        };

        let links = resolve_links(&record, &schema.foreign_keys);
        Ok(Some(RecordView {
            table: schema.table,
            record_id: id.to_string(),
            record,
            columns: schema.columns,
            primary_key: schema.primary_key,
            foreign_keys: schema.foreign_keys,
            links,
        }))
    }

    /// The project's users table, newest first
    pub async fn users_page(&self, request: PageRequest) -> Result<Page, ExplorerError> {
        let table = self.project.users_table_name().to_string();
        self.read_page(&table, request, &RowOrder::newest_first()).await
    }

    /// The project's feedback table, newest first; empty when none is configured
    pub async fn feedbacks_page(&self, request: PageRequest) -> Result<Page, ExplorerError> {
        let Some(table) = self.project.feedbacks_table_name().map(str::to_string) else {
            return Ok(Page::empty(request));
        };
        self.read_page(&table, request, &RowOrder::newest_first()).await
    }

    async fn read_page(
        &self,
        table: &str,
        request: PageRequest,
        order: &RowOrder,
    ) -> Result<Page, ExplorerError> {
        match self.connect().await? {
            Some(handle) => reader::page(handle.as_ref(), table, request, order).await,
            None => Ok(Page::empty(request)),
        }
    }
}

/// Pinned tables present in `live`, in the user's order
pub fn pinned_among(pinned: &[String], live: &[String]) -> Vec<String> {
    pinned
        .iter()
        .filter(|name| live.contains(name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellValue;
    use crate::schema::ForeignKeyTarget;

    fn settings() -> ExplorerSettings {
        ExplorerSettings {
            default_page_size: 15,
            max_page_size: 100,
            statement_timeout_ms: 1_000,
            connect_timeout_ms: 200,
            max_connections: 1,
        }
    }

    #[tokio::test]
    async fn unconfigured_project_reads_empty() {
        let db = ProjectDatabase::new(
            Project {
                id: "blank".to_string(),
                ..Project::default()
            },
            settings(),
        );
        let request = PageRequest::first(15).unwrap();

        assert!(db.connect().await.unwrap().is_none());
        assert!(db.tables().await.unwrap().is_empty());
        assert!(db.pinned_tables().await.unwrap().is_empty());
        assert!(db.table_columns("users").await.unwrap().is_empty());
        assert_eq!(db.table_row_count("users").await.unwrap(), 0);
        assert_eq!(db.primary_key("users").await.unwrap(), None);
        assert!(db.foreign_keys("users").await.unwrap().is_empty());
        assert!(db.table_schema("users").await.unwrap().is_none());
        assert!(db.record("users", "1").await.unwrap().is_none());

        for page in [
            db.table_page("users", request).await.unwrap(),
            db.users_page(request).await.unwrap(),
            db.feedbacks_page(request).await.unwrap(),
        ] {
            assert!(page.rows.is_empty());
            assert_eq!(page.total, 0);
        }

        let status = db.test_connection().await;
        assert!(!status.connected);
        assert_eq!(status.error.as_deref(), Some(NOT_CONFIGURED_MESSAGE));

        db.disconnect().await;
        db.close().await;
    }

    #[tokio::test]
    async fn unsupported_driver_reports_cleanly() {
        let db = ProjectDatabase::new(
            Project {
                id: "x".to_string(),
                db_driver: "oracle".to_string(),
                db_host: "h".to_string(),
                db_database: "d".to_string(),
                db_username: "u".to_string(),
                ..Project::default()
            },
            settings(),
        );
        let status = db.test_connection().await;
        assert!(!status.connected);
        assert_eq!(status.error.as_deref(), Some("Unsupported database driver: oracle"));
    }

    #[test]
    fn links_skip_null_values() {
        let mut record = Row::default();
        record.push("id", CellValue::Int(1));
        record.push("author_id", CellValue::Int(9));
        record.push("editor_id", CellValue::Null);

        let mut fks = ForeignKeyMap::new();
        fks.insert("author_id".to_string(), ForeignKeyTarget::new("authors", "id"));
        fks.insert("editor_id".to_string(), ForeignKeyTarget::new("users", "id"));

        let links = resolve_links(&record, &fks);
        assert_eq!(links.len(), 1);
        assert_eq!(
            links.get("author_id"),
            Some(&ForeignKeyLink {
                table: "authors".to_string(),
                column: "id".to_string(),
                value: "9".to_string(),
            })
        );
    }

    #[test]
    fn pinned_tables_keep_user_order_and_drop_missing() {
        let pinned = vec!["orders".to_string(), "gone".to_string(), "users".to_string()];
        let live = vec!["users".to_string(), "orders".to_string()];
        assert_eq!(
            pinned_among(&pinned, &live),
            vec!["orders".to_string(), "users".to_string()]
        );
    }
}
