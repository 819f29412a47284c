/// MySQL / MariaDB handle
///
/// Catalog data comes from `information_schema`, scoped to the project's
/// database. Identifiers are backtick-quoted; values are always bound.

use crate::config::ExplorerSettings;
use crate::connection::{bounded, DatabaseHandle};
use crate::data::{CellValue, Row, RowOrder};
use crate::error::{ExplorerError, IntrospectionError};
use crate::project::types::{DatabaseDriver, Project};
use crate::schema::{ForeignKeyMap, ForeignKeyTarget};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Connection, Row as _, TypeInfo, ValueRef};
use std::time::Duration;

/// Pooled connection to one project's MySQL database
#[derive(Debug)]
pub struct MySqlHandle {
    name: String,
    database: String,
    pool: MySqlPool,
    statement_timeout: Duration,
}

impl MySqlHandle {
    /// Register a lazily-connecting pool for the project
    pub fn open(project: &Project, settings: &ExplorerSettings) -> Self {
        let port = project
            .db_port
            .or(DatabaseDriver::MySql.default_port())
            .unwrap_or(3306);

        let options = MySqlConnectOptions::new()
            .host(project.db_host.trim())
            .port(port)
            .username(&project.db_username)
            .password(&project.db_password)
            .database(project.db_database.trim())
            .charset("utf8mb4")
            .collation("utf8mb4_unicode_ci");

        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections.max(1))
            .min_connections(0)
            .acquire_timeout(settings.connect_timeout())
            .connect_lazy_with(options);

        Self {
            name: project.connection_name(),
            database: project.db_database.trim().to_string(),
            pool,
            statement_timeout: settings.statement_timeout(),
        }
    }
}

fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn order_clause(order: &RowOrder) -> String {
    match order {
        RowOrder::Natural => String::new(),
        RowOrder::NewestFirst { column } => format!(" ORDER BY {} DESC", quote_ident(column)),
    }
}

#[async_trait]
impl DatabaseHandle for MySqlHandle {
    fn connection_name(&self) -> &str {
        &self.name
    }

    fn driver(&self) -> DatabaseDriver {
        DatabaseDriver::MySql
    }

    async fn ping(&self) -> Result<(), ExplorerError> {
        bounded(self.statement_timeout, async {
            let mut conn = self.pool.acquire().await?;
            conn.ping().await
        })
        .await
    }

    async fn table_names(&self) -> Result<Vec<String>, ExplorerError> {
        tracing::debug!("📋 Listing tables of {} via {}", self.database, self.name);
        bounded(
            self.statement_timeout,
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT CAST(TABLE_NAME AS CHAR) AS table_name
                FROM information_schema.TABLES
                WHERE TABLE_SCHEMA = ?
                ORDER BY TABLE_NAME
                "#,
            )
            .bind(&self.database)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn column_names(&self, table: &str) -> Result<Vec<String>, ExplorerError> {
        bounded(
            self.statement_timeout,
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT CAST(COLUMN_NAME AS CHAR) AS column_name
                FROM information_schema.COLUMNS
                WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
                ORDER BY ORDINAL_POSITION
                "#,
            )
            .bind(&self.database)
            .bind(table)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn count_rows(&self, table: &str) -> Result<u64, ExplorerError> {
        let query = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let count: i64 = bounded(
            self.statement_timeout,
            sqlx::query_scalar(&query).fetch_one(&self.pool),
        )
        .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn primary_key_column(&self, table: &str) -> Result<Option<String>, IntrospectionError> {
        let column = bounded(
            self.statement_timeout,
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT CAST(COLUMN_NAME AS CHAR) AS column_name
                FROM information_schema.KEY_COLUMN_USAGE
                WHERE TABLE_SCHEMA = ?
                    AND TABLE_NAME = ?
                    AND CONSTRAINT_NAME = 'PRIMARY'
                ORDER BY ORDINAL_POSITION
                LIMIT 1
                "#,
            )
            .bind(&self.database)
            .bind(table)
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(column)
    }

    async fn declared_foreign_keys(&self, table: &str) -> Result<ForeignKeyMap, IntrospectionError> {
        let rows: Vec<(String, String, String)> = bounded(
            self.statement_timeout,
            sqlx::query_as(
                r#"
                SELECT
                    CAST(COLUMN_NAME AS CHAR) AS column_name,
                    CAST(REFERENCED_TABLE_NAME AS CHAR) AS referenced_table,
                    CAST(REFERENCED_COLUMN_NAME AS CHAR) AS referenced_column
                FROM information_schema.KEY_COLUMN_USAGE
                WHERE TABLE_SCHEMA = ?
                    AND TABLE_NAME = ?
                    AND REFERENCED_TABLE_NAME IS NOT NULL
                "#,
            )
            .bind(&self.database)
            .bind(table)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|(column, table, referenced)| (column, ForeignKeyTarget::new(table, referenced)))
            .collect())
    }

    async fn fetch_rows(
        &self,
        table: &str,
        order: &RowOrder,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Row>, ExplorerError> {
        let query = format!(
            "SELECT * FROM {}{} LIMIT ? OFFSET ?",
            quote_ident(table),
            order_clause(order)
        );
        let rows = bounded(
            self.statement_timeout,
            sqlx::query(&query)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool),
        )
        .await?;
        Ok(rows.iter().map(decode_row).collect())
    }

    async fn fetch_first(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Option<Row>, ExplorerError> {
        let query = format!(
            "SELECT * FROM {} WHERE {} = ? LIMIT 1",
            quote_ident(table),
            quote_ident(column)
        );
        let row = bounded(
            self.statement_timeout,
            sqlx::query(&query).bind(value).fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.as_ref().map(decode_row))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn decode_row(row: &MySqlRow) -> Row {
    let mut decoded = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_cell(row, column.ordinal(), column.type_info().name());
        decoded.push(column.name(), value);
    }
    decoded
}

/// Decode by declared column type, falling back to text, then bytes
fn decode_cell(row: &MySqlRow, idx: usize, type_name: &str) -> CellValue {
    match row.try_get_raw(idx) {
        Ok(raw) if !raw.is_null() => {}
        _ => return CellValue::Null,
    }

    let typed = match type_name {
        "BOOLEAN" => row.try_get_unchecked::<bool, _>(idx).map(CellValue::Bool),
        unsigned if unsigned.ends_with("UNSIGNED") => {
            row.try_get_unchecked::<u64, _>(idx).map(CellValue::UInt)
        }
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            row.try_get_unchecked::<i64, _>(idx).map(CellValue::Int)
        }
        "FLOAT" => row
            .try_get_unchecked::<f32, _>(idx)
            .map(|v| CellValue::Float(f64::from(v))),
        "DOUBLE" => row.try_get_unchecked::<f64, _>(idx).map(CellValue::Float),
        "DATE" => row.try_get_unchecked::<NaiveDate, _>(idx).map(CellValue::Date),
        "TIME" => row.try_get_unchecked::<NaiveTime, _>(idx).map(CellValue::Time),
        "DATETIME" | "TIMESTAMP" => row
            .try_get_unchecked::<NaiveDateTime, _>(idx)
            .map(CellValue::DateTime),
        "JSON" => row
            .try_get_unchecked::<serde_json::Value, _>(idx)
            .map(CellValue::Json),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
        | "GEOMETRY" => row.try_get_unchecked::<Vec<u8>, _>(idx).map(CellValue::Bytes),
        _ => row.try_get_unchecked::<String, _>(idx).map(CellValue::Text),
    };

    typed
        .or_else(|_| row.try_get_unchecked::<String, _>(idx).map(CellValue::Text))
        .or_else(|_| row.try_get_unchecked::<Vec<u8>, _>(idx).map(CellValue::Bytes))
        .unwrap_or_else(|e| {
            tracing::warn!("⚠️ Could not decode column {} ({}): {}", idx, type_name, e);
            CellValue::Null
        })
}
