//! Page-number pagination with a fixed page size.

use serde::Serialize;

/// Rows per page on every list endpoint.
pub const PAGE_SIZE: i64 = 15;

/// Clamp a user-provided page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset of the first item on `page`.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(per_page)
}

/// Number of the last page; 1 even when there are no rows.
pub fn last_page(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 1;
    }
    (total + per_page - 1) / per_page
}

/// One page of results plus the counters the client needs to render
/// page navigation.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub current_page: i64,
    pub last_page: i64,
    pub per_page: i64,
    pub total: i64,
    /// 1-based position of the first row on this page, `None` when empty.
    pub from: Option<i64>,
    /// 1-based position of the last row on this page, `None` when empty.
    pub to: Option<i64>,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(data: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let first = page_offset(page, per_page) + 1;
            (Some(first), Some(first + data.len() as i64 - 1))
        };
        Self {
            current_page: page,
            last_page: last_page(total, per_page),
            per_page,
            total,
            from,
            to,
            data,
        }
    }
}
