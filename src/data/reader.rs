/// Offset-paginated reads against arbitrary tables
///
/// Every call is one stateless round trip through a handle obtained from the
/// connection registry. Nothing here retries; failures surface to the caller.

use crate::connection::DatabaseHandle;
use crate::data::page::{Page, PageRequest, RowOrder};
use crate::data::value::Row;
use crate::error::ExplorerError;
use crate::schema::introspector;

/// Read one page of `table`
///
/// The total is an exact count taken first; the row window is skipped when
/// it would fall past the end.
pub async fn page(
    handle: &dyn DatabaseHandle,
    table: &str,
    request: PageRequest,
    order: &RowOrder,
) -> Result<Page, ExplorerError> {
    let total = introspector::row_count(handle, table).await?;

    if total == 0 || request.offset() >= total {
        return Ok(Page::new(Vec::new(), total, request));
    }

    tracing::debug!(
        "📖 Reading {} page {} (size {}) via {}",
        table,
        request.page(),
        request.page_size(),
        handle.connection_name()
    );
    let rows = handle
        .fetch_rows(table, order, request.limit(), request.offset())
        .await?;

    Ok(Page::new(rows, total, request))
}

/// First row where `column` equals `value`, if any
///
/// No uniqueness is assumed; on a non-unique column this is whichever row
/// the engine returns first.
pub async fn get_one(
    handle: &dyn DatabaseHandle,
    table: &str,
    column: &str,
    value: &str,
) -> Result<Option<Row>, ExplorerError> {
    tracing::debug!("🔍 Looking up {}.{} = {}", table, column, value);
    handle.fetch_first(table, column, value).await
}
