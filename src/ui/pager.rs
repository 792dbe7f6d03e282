//! Pager view model: page links, range text and navigation bounds

use crate::data::pagination::PaginationInfo;

/// One slot in the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Page links to show for `current` of `total` pages.
///
/// Up to `max_visible` pages are all listed. Past that the first and last
/// pages are always shown, with the current page and its neighbours in
/// between and an ellipsis standing in for each skipped run.
pub fn page_numbers(current: usize, total: usize, max_visible: usize) -> Vec<PageItem> {
    if total <= max_visible {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut items = vec![PageItem::Page(1)];
    if current > 3 {
        items.push(PageItem::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total - 1);
    items.extend((start..=end).map(PageItem::Page));

    if current.saturating_add(2) < total {
        items.push(PageItem::Ellipsis);
    }
    if total > 1 {
        items.push(PageItem::Page(total));
    }
    items
}

/// 1-based first and last item numbers on the current page; `(0, 0)` when
/// there are no items
pub fn item_range(current: usize, page_size: usize, total_items: usize) -> (usize, usize) {
    if total_items == 0 {
        return (0, 0);
    }
    let start = current
        .saturating_sub(1)
        .saturating_mul(page_size)
        .saturating_add(1);
    let end = current.saturating_mul(page_size).min(total_items);
    (start, end)
}

#[derive(Debug, Clone)]
pub struct Pager {
    info: PaginationInfo,
    item_label: String,
    max_visible_pages: usize,
    page_size_options: Vec<usize>,
}

impl Pager {
    pub fn new(info: PaginationInfo) -> Self {
        Self {
            info,
            item_label: "items".to_string(),
            max_visible_pages: 5,
            page_size_options: vec![10, 25, 50, 100],
        }
    }

    pub fn with_item_label(mut self, label: impl Into<String>) -> Self {
        self.item_label = label.into();
        self
    }

    pub fn with_max_visible_pages(mut self, max: usize) -> Self {
        self.max_visible_pages = max;
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    pub fn info(&self) -> &PaginationInfo {
        &self.info
    }

    /// The pager is hidden when there is nothing to page through
    pub fn is_visible(&self) -> bool {
        self.info.total_items > 0
    }

    pub fn items(&self) -> Vec<PageItem> {
        page_numbers(
            self.info.current_page,
            self.info.total_pages,
            self.max_visible_pages,
        )
    }

    pub fn range(&self) -> (usize, usize) {
        item_range(
            self.info.current_page,
            self.info.items_per_page,
            self.info.total_items,
        )
    }

    /// e.g. "Showing 11-20 of 42 users"
    pub fn summary(&self) -> String {
        let (start, end) = self.range();
        format!(
            "Showing {}-{} of {} {}",
            start, end, self.info.total_items, self.item_label
        )
    }

    pub fn can_go_previous(&self) -> bool {
        self.info.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.info.current_page < self.info.total_pages
    }

    pub fn previous_page(&self) -> Option<usize> {
        self.can_go_previous().then(|| self.info.current_page - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        self.can_go_next().then(|| self.info.current_page + 1)
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Pager line as text, e.g. "‹ 1 … 4 [5] 6 … 12 ›"
    pub fn render_line(&self) -> String {
        let mut parts = Vec::new();
        parts.push(if self.can_go_previous() { "‹" } else { " " }.to_string());
        for item in self.items() {
            parts.push(match item {
                PageItem::Page(p) if p == self.info.current_page => format!("[{}]", p),
                PageItem::Page(p) => p.to_string(),
                PageItem::Ellipsis => "…".to_string(),
            });
        }
        parts.push(if self.can_go_next() { "›" } else { " " }.to_string());
        parts.join(" ")
    }
}
