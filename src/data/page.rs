/// Offset pagination types shared by every listing

use crate::data::value::Row;
use crate::error::ExplorerError;
use serde::Serialize;

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_size: u32,
    page: u32,
}

impl PageRequest {
    /// Build a window; page numbers below 1 resolve to the first page
    ///
    /// Upper-bounding `page_size` is the caller's job.
    pub fn new(page_size: u32, page: u32) -> Result<Self, ExplorerError> {
        if page_size == 0 {
            return Err(ExplorerError::InvalidPage(
                "page size must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            page_size,
            page: page.max(1),
        })
    }

    pub fn first(page_size: u32) -> Result<Self, ExplorerError> {
        Self::new(page_size, 1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// Row ordering for a page query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOrder {
    /// Storage order, used for generic table browsing
    Natural,
    /// Descending on a creation-time column, used for listings
    NewestFirst { column: String },
}

impl RowOrder {
    pub fn newest_first() -> Self {
        RowOrder::NewestFirst {
            column: "created_at".to_string(),
        }
    }
}

/// A bounded window over a table plus its exact total
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub rows: Vec<Row>,
    pub total: u64,
    pub page_size: u32,
    pub page: u32,
    pub last_page: u32,
}

impl Page {
    pub fn new(rows: Vec<Row>, total: u64, request: PageRequest) -> Self {
        let pages = total.div_ceil(request.limit()).max(1);
        Self {
            rows,
            total,
            page_size: request.page_size(),
            page: request.page(),
            last_page: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }

    /// Page used when there is nothing to read (no database, no table configured)
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }
}
