/// SQLite handle
///
/// The project's `db_database` is the path of an existing database file,
/// opened read-only. Catalog data comes from `sqlite_master` and the
/// `pragma_*` table-valued functions.

use crate::config::ExplorerSettings;
use crate::connection::{bounded, DatabaseHandle};
use crate::data::{CellValue, Row, RowOrder};
use crate::error::{ExplorerError, IntrospectionError};
use crate::project::types::{DatabaseDriver, Project};
use crate::schema::types::DEFAULT_PRIMARY_KEY;
use crate::schema::{ForeignKeyMap, ForeignKeyTarget};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Connection, Row as _, TypeInfo, ValueRef};
use std::time::Duration;

/// Pooled, read-only connection to one project's SQLite file
#[derive(Debug)]
pub struct SqliteHandle {
    name: String,
    pool: SqlitePool,
    statement_timeout: Duration,
}

impl SqliteHandle {
    pub fn open(project: &Project, settings: &ExplorerSettings) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(project.db_database.trim())
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections.max(1))
            .min_connections(0)
            .acquire_timeout(settings.connect_timeout())
            .connect_lazy_with(options);

        Self {
            name: project.connection_name(),
            pool,
            statement_timeout: settings.statement_timeout(),
        }
    }

    /// Whether `table` has a column named `column`
    ///
    /// SQLite reads a double-quoted name that is not a column as a string
    /// literal, so column names are checked before they reach a query.
    async fn has_column(&self, table: &str, column: &str) -> Result<bool, ExplorerError> {
        let found = bounded(
            self.statement_timeout,
            sqlx::query_scalar::<_, i64>(
                "SELECT 1 FROM pragma_table_info(?) WHERE name = ? COLLATE NOCASE",
            )
            .bind(table)
            .bind(column)
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(found.is_some())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn order_clause(order: &RowOrder) -> String {
    match order {
        RowOrder::Natural => String::new(),
        RowOrder::NewestFirst { column } => format!(" ORDER BY {} DESC", quote_ident(column)),
    }
}

fn as_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl DatabaseHandle for SqliteHandle {
    fn connection_name(&self) -> &str {
        &self.name
    }

    fn driver(&self) -> DatabaseDriver {
        DatabaseDriver::Sqlite
    }

    async fn ping(&self) -> Result<(), ExplorerError> {
        bounded(self.statement_timeout, async {
            let mut conn = self.pool.acquire().await?;
            conn.ping().await
        })
        .await
    }

    async fn table_names(&self) -> Result<Vec<String>, ExplorerError> {
        tracing::debug!("📋 Listing tables via {}", self.name);
        bounded(
            self.statement_timeout,
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT name FROM sqlite_master
                WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                ORDER BY name
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn column_names(&self, table: &str) -> Result<Vec<String>, ExplorerError> {
        bounded(
            self.statement_timeout,
            sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info(?) ORDER BY cid")
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
                "SELECT name FROM pragma_table_info(?) WHERE pk > 0 ORDER BY pk LIMIT 1",
            )
            .bind(table)
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(column)
    }

    async fn declared_foreign_keys(&self, table: &str) -> Result<ForeignKeyMap, IntrospectionError> {
        let rows: Vec<(String, String, Option<String>)> = bounded(
            self.statement_timeout,
            sqlx::query_as(r#"SELECT "from", "table", "to" FROM pragma_foreign_key_list(?)"#)
                .bind(table)
                .fetch_all(&self.pool),
        )
        .await?;

        let mut foreign_keys = ForeignKeyMap::new();
        for (column, parent, referenced) in rows {
            // `to` is NULL when the constraint targets the parent's primary key
            let referenced = match referenced {
                Some(referenced) => referenced,
                None => self
                    .primary_key_column(&parent)
                    .await?
                    .unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string()),
            };
            foreign_keys.insert(column, ForeignKeyTarget::new(parent, referenced));
        }
        Ok(foreign_keys)
    }

    async fn fetch_rows(
        &self,
        table: &str,
        order: &RowOrder,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Row>, ExplorerError> {
        if let RowOrder::NewestFirst { column } = order {
            if !self.has_column(table, column).await? {
                return Err(ExplorerError::Query(format!(
                    "no such column: {}.{}",
                    table, column
                )));
            }
        }

        let query = format!(
            "SELECT * FROM {}{} LIMIT ? OFFSET ?",
            quote_ident(table),
            order_clause(order)
        );
        let rows = bounded(
            self.statement_timeout,
            sqlx::query(&query)
                .bind(as_i64(limit))
                .bind(as_i64(offset))
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
        if !self.has_column(table, column).await? {
            tracing::debug!("No column {} on {}, nothing to match", column, table);
            return Ok(None);
        }

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

fn decode_row(row: &SqliteRow) -> Row {
    let mut decoded = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_cell(row, column.ordinal(), column.type_info().name());
        decoded.push(column.name(), value);
    }
    decoded
}

/// Decode by the value's storage class, refined by the declared column type
///
/// SQLite is dynamically typed, so a declared type alone cannot be trusted.
fn decode_cell(row: &SqliteRow, idx: usize, declared: &str) -> CellValue {
    let storage = match row.try_get_raw(idx) {
        Ok(raw) if !raw.is_null() => raw.type_info().name().to_string(),
        _ => return CellValue::Null,
    };

    let typed = match (declared, storage.as_str()) {
        ("BOOLEAN", "INTEGER") => row.try_get_unchecked::<bool, _>(idx).map(CellValue::Bool),
        ("DATETIME", "TEXT") => row
            .try_get_unchecked::<NaiveDateTime, _>(idx)
            .map(CellValue::DateTime),
        ("DATE", "TEXT") => row.try_get_unchecked::<NaiveDate, _>(idx).map(CellValue::Date),
        ("TIME", "TEXT") => row.try_get_unchecked::<NaiveTime, _>(idx).map(CellValue::Time),
        (_, "INTEGER") => row.try_get_unchecked::<i64, _>(idx).map(CellValue::Int),
        (_, "REAL") => row.try_get_unchecked::<f64, _>(idx).map(CellValue::Float),
        (_, "BLOB") => row.try_get_unchecked::<Vec<u8>, _>(idx).map(CellValue::Bytes),
        _ => row.try_get_unchecked::<String, _>(idx).map(CellValue::Text),
    };

    typed
        .or_else(|_| row.try_get_unchecked::<String, _>(idx).map(CellValue::Text))
        .unwrap_or_else(|e| {
            tracing::warn!("⚠️ Could not decode column {} ({}): {}", idx, declared, e);
            CellValue::Null
        })
}
