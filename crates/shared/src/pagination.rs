//! Offset-based pagination utilities.

use serde::Serialize;

/// Default page size when the client does not send `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Builds a page request from optional query values.
    ///
    /// Pages start at 1; `limit` is clamped into `1..=max_limit`.
    pub fn new(page: Option<i64>, limit: Option<i64>, max_limit: i64) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, max_limit.max(1));
        Self { page, limit }
    }

    /// Row offset for SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Builds the response metadata for a total row count.
    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            total,
            page: self.page,
            limit: self.limit,
            total_pages: total_pages(total, self.limit),
        }
    }
}

/// Pagination metadata returned alongside list data.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// A page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Number of pages needed for `total` rows at `limit` rows per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}
