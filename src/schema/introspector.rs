/// Schema introspection over a live handle
///
/// Primary-key and foreign-key detection are best-effort: catalog failures
/// are swallowed here, and only here, and degrade to defaults so that record
/// viewing is never blocked by missing catalog privileges.

use crate::connection::DatabaseHandle;
use crate::error::ExplorerError;
use crate::schema::inference::infer_foreign_keys;
use crate::schema::types::{ForeignKeyMap, TableSchema, DEFAULT_PRIMARY_KEY};

/// Table names exactly as the target reports them
pub async fn list_tables(handle: &dyn DatabaseHandle) -> Result<Vec<String>, ExplorerError> {
    handle.table_names().await
}

/// Column names in declared order
pub async fn list_columns(
    handle: &dyn DatabaseHandle,
    table: &str,
) -> Result<Vec<String>, ExplorerError> {
    handle.column_names(table).await
}

/// Exact row count at call time
pub async fn row_count(handle: &dyn DatabaseHandle, table: &str) -> Result<u64, ExplorerError> {
    handle.count_rows(table).await
}

/// Primary-key column, or `id` when the catalog cannot say
pub async fn primary_key(handle: &dyn DatabaseHandle, table: &str) -> String {
    match handle.primary_key_column(table).await {
        Ok(Some(column)) => column,
        Ok(None) => {
            tracing::debug!("No PRIMARY constraint on {}, assuming '{}'", table, DEFAULT_PRIMARY_KEY);
            DEFAULT_PRIMARY_KEY.to_string()
        }
        Err(e) => {
            tracing::warn!(
                "⚠️ Primary key lookup failed for {} on {}, assuming '{}': {}",
                table,
                handle.connection_name(),
                DEFAULT_PRIMARY_KEY,
                e
            );
            DEFAULT_PRIMARY_KEY.to_string()
        }
    }
}

/// Foreign keys of `table`
///
/// Formal constraints are authoritative. Naming-convention inference runs
/// only when the catalog yields none (or cannot be read); the two are never
/// merged.
pub async fn foreign_keys(
    handle: &dyn DatabaseHandle,
    table: &str,
) -> Result<ForeignKeyMap, ExplorerError> {
    let declared = match handle.declared_foreign_keys(table).await {
        Ok(declared) => declared,
        Err(e) => {
            tracing::warn!(
                "⚠️ Foreign key lookup failed for {} on {}, falling back to naming convention: {}",
                table,
                handle.connection_name(),
                e
            );
            ForeignKeyMap::new()
        }
    };

    if !declared.is_empty() {
        return Ok(declared);
    }

    let columns = list_columns(handle, table).await?;
    let tables = list_tables(handle).await?;
    let inferred = infer_foreign_keys(&columns, &tables);
    tracing::debug!(
        "🔗 Inferred {} relationship(s) for {} by naming convention",
        inferred.len(),
        table
    );
    Ok(inferred)
}

/// Columns, primary key and foreign keys of `table`, recomputed on every call
pub async fn describe_table(
    handle: &dyn DatabaseHandle,
    table: &str,
) -> Result<TableSchema, ExplorerError> {
    let columns = list_columns(handle, table).await?;
    let primary_key = primary_key(handle, table).await;
    let foreign_keys = foreign_keys(handle, table).await?;

    Ok(TableSchema {
        table: table.to_string(),
        columns,
        primary_key,
        foreign_keys,
    })
}
