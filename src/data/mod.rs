/// Paginated Data Reader
///
/// Generic, schema-agnostic row access:
/// - Typed cell values and ordered rows
/// - Offset pagination with exact totals
/// - Single-row lookup on an arbitrary column

pub mod page;
pub mod reader;
pub mod value;

pub use page::{Page, PageRequest, RowOrder};
pub use value::{CellValue, Row};
