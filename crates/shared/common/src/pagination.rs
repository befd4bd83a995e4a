//! Page-based pagination for list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Query parameters `?page=&pageSize=` (1-based page).
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }.normalized()
    }

    /// Clamp to a page >= 1 and a size in 1..=MAX_PAGE_SIZE.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based page index
    pub fn index(&self) -> u64 {
        self.page.max(1) - 1
    }

    pub fn offset(&self) -> u64 {
        self.index() * self.page_size
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// A page of items
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, params: PaginationParams, total_items: u64) -> Self {
        let total_pages = if params.page_size == 0 {
            0
        } else {
            total_items.div_ceil(params.page_size)
        };

        Self {
            items,
            meta: PaginationMeta {
                page: params.page,
                page_size: params.page_size,
                total_items,
                total_pages,
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
