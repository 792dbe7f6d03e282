use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Current page (1-based) and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageState {
    pub fn new(current_page: usize, page_size: usize) -> Self {
        Self {
            current_page,
            page_size,
        }
    }
}

/// Pagination numbers handed to a pager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
}

impl PaginationInfo {
    pub fn new(page: PageState, total_items: usize) -> Self {
        Self {
            current_page: page.current_page,
            total_pages: total_pages(total_items, page.page_size),
            total_items,
            items_per_page: page.page_size,
        }
    }
}

/// Number of pages needed for `total_items`; never less than 1
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

/// The `page`-th window of `page_size` items, 1-based.
///
/// No clamping: a page past the end is an empty slice. Page 0 reads as
/// page 1.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
