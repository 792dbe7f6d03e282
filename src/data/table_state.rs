//! View state for a client-side table.
//!
//! `TableState` owns the records plus page, sort and search state, and keeps
//! the derived row order up to date. Every mutation recomputes the derived
//! view in the fixed order filter → sort; pagination is a slice over that.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::config::TableConfig;
use crate::data::pagination::{paginate, total_pages, PageState, PaginationInfo};
use crate::data::record::Record;
use crate::data::search_filter::record_matches;
use crate::data::sort::{sorted_order, SortSpec};

/// Initial state for a [`TableState`]
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub initial_page: usize,
    pub initial_page_size: usize,
    pub initial_sort: Option<SortSpec>,
    /// Restrict search to these keys; `None` searches every field
    pub search_keys: Option<Vec<String>>,
}

impl Default for TableOptions {
    fn default() -> Self {
        let page = PageState::default();
        Self {
            initial_page: page.current_page,
            initial_page_size: page.page_size,
            initial_sort: None,
            search_keys: None,
        }
    }
}

impl TableOptions {
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            initial_page_size: config.default_page_size,
            ..Self::default()
        }
    }
}

/// Snapshot of the current page with its state and totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    pub rows: Vec<Record>,
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub sort: Option<SortSpec>,
    pub search_term: String,
}

/// Page, sort and search state over an in-memory collection
#[derive(Debug, Clone)]
pub struct TableState {
    data: Vec<Record>,
    page: PageState,
    sort: Option<SortSpec>,
    search_term: String,
    search_keys: Option<Vec<String>>,
    is_loading: bool,
    error: Option<String>,

    /// Indices into `data` after filtering and sorting
    visible_rows: Vec<usize>,
}

impl TableState {
    pub fn new(data: Vec<Record>) -> Self {
        Self::with_options(data, TableOptions::default())
    }

    pub fn with_options(data: Vec<Record>, options: TableOptions) -> Self {
        let mut state = Self {
            data,
            page: PageState::new(options.initial_page, options.initial_page_size),
            sort: options.initial_sort,
            search_term: String::new(),
            search_keys: options.search_keys,
            is_loading: false,
            error: None,
            visible_rows: Vec::new(),
        };
        state.recompute();
        state
    }

    /// Replace the base collection, keeping page, sort and search
    pub fn set_data(&mut self, data: Vec<Record>) {
        self.data = data;
        self.recompute();
    }

    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Filtered and sorted records, before pagination
    pub fn processed_data(&self) -> Vec<&Record> {
        self.visible_rows.iter().map(|&idx| &self.data[idx]).collect()
    }

    /// Records on the current page
    pub fn paginated_data(&self) -> Vec<&Record> {
        paginate(&self.visible_rows, self.page.current_page, self.page.page_size)
            .iter()
            .map(|&idx| &self.data[idx])
            .collect()
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page.page_size
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    /// Number of records left after filtering
    pub fn total_items(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items(), self.page.page_size)
    }

    pub fn pagination(&self) -> PaginationInfo {
        PaginationInfo::new(self.page, self.total_items())
    }

    /// Jump to a page. Not validated against `total_pages`.
    pub fn set_page(&mut self, page: usize) {
        trace!(target: "table_state", "Page {} -> {}", self.page.current_page, page);
        self.page.current_page = page;
    }

    pub fn set_page_size(&mut self, size: usize) {
        debug!(target: "table_state", "Page size {} -> {}", self.page.page_size, size);
        self.page.page_size = size;
        self.page.current_page = 1;
    }

    pub fn sort_config(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Sort by `key`, flipping direction if it is already the sort key
    pub fn set_sort(&mut self, key: &str) {
        let next = SortSpec::toggled(self.sort.as_ref(), key);
        debug!(target: "table_state", "Sort by {} {}", next.key, next.direction);
        self.sort = Some(next);
        self.page.current_page = 1;
        self.recompute();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.page.current_page = 1;
        self.recompute();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page.current_page = 1;
        self.recompute();
        debug!(
            target: "table_state",
            "Search '{}' matched {} of {} records",
            self.search_term,
            self.visible_rows.len(),
            self.data.len()
        );
    }

    pub fn search_keys(&self) -> Option<&[String]> {
        self.search_keys.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Owned snapshot of the current page and state
    pub fn view(&self) -> DerivedView {
        DerivedView {
            rows: self.paginated_data().into_iter().cloned().collect(),
            current_page: self.page.current_page,
            page_size: self.page.page_size,
            total_items: self.total_items(),
            total_pages: self.total_pages(),
            sort: self.sort.clone(),
            search_term: self.search_term.clone(),
        }
    }

    fn recompute(&mut self) {
        let lowered = self.search_term.to_lowercase();
        let keys = self.search_keys.as_deref();

        let mut rows: Vec<usize> = (0..self.data.len())
            .filter(|&idx| lowered.is_empty() || record_matches(&self.data[idx], &lowered, keys))
            .collect();

        if let Some(sort) = &self.sort {
            let candidates: Vec<&Record> = rows.iter().map(|&idx| &self.data[idx]).collect();
            rows = sorted_order(&candidates, &sort.key, sort.direction)
                .into_iter()
                .map(|pos| rows[pos])
                .collect();
        }

        trace!(target: "table_state", "Recomputed {} visible rows", rows.len());
        self.visible_rows = rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sort::SortDirection;

    fn numbered(count: usize) -> Vec<Record> {
        (1..=count)
            .map(|n| {
                Record::new()
                    .with("id", n as i64)
                    .with("name", format!("User {:02}", n))
            })
            .collect()
    }

    fn ids(rows: &[&Record]) -> Vec<i64> {
        rows.iter()
            .filter_map(|r| match r.value("id") {
                crate::data::datavalue::DataValue::Integer(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        let state = TableState::new(numbered(3));
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_size(), 10);
        assert!(state.sort_config().is_none());
        assert_eq!(state.search_term(), "");
        assert!(!state.is_loading());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_twelve_records_five_per_page() {
        let mut state = TableState::new(numbered(12));
        state.set_page_size(5);

        assert_eq!(state.total_pages(), 3);
        assert_eq!(ids(&state.paginated_data()), vec![1, 2, 3, 4, 5]);

        state.set_page(3);
        assert_eq!(ids(&state.paginated_data()), vec![11, 12]);
    }

    #[test]
    fn test_search_resets_page() {
        let mut state = TableState::new(numbered(30));
        state.set_page(3);
        state.set_search_term("user 1");

        assert_eq!(state.current_page(), 1);
        // User 10 through User 19
        assert_eq!(state.total_items(), 10);
    }

    #[test]
    fn test_sort_toggles_and_resets_page() {
        let mut state = TableState::new(numbered(12));
        state.set_page(2);

        state.set_sort("id");
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.sort_config(), Some(&SortSpec::ascending("id")));

        state.set_sort("id");
        assert_eq!(
            state.sort_config().map(|s| s.direction),
            Some(SortDirection::Descending)
        );
        assert_eq!(ids(&state.paginated_data())[0], 12);

        state.set_sort("name");
        assert_eq!(state.sort_config(), Some(&SortSpec::ascending("name")));
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut state = TableState::new(numbered(12));
        state.set_page(2);
        state.set_page_size(25);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 1);
    }

    #[test]
    fn test_set_page_is_not_validated() {
        let mut state = TableState::new(numbered(3));
        state.set_page(9);
        assert_eq!(state.current_page(), 9);
        assert!(state.paginated_data().is_empty());
    }

    #[test]
    fn test_empty_table() {
        let state = TableState::new(Vec::new());
        assert_eq!(state.total_items(), 0);
        assert_eq!(state.total_pages(), 1);
        assert!(state.paginated_data().is_empty());
    }

    #[test]
    fn test_set_data_keeps_state() {
        let mut state = TableState::new(numbered(3));
        state.set_search_term("user 0");
        state.set_data(numbered(12));
        assert_eq!(state.search_term(), "user 0");
        assert_eq!(state.total_items(), 9);
    }

    #[test]
    fn test_initial_options() {
        let options = TableOptions {
            initial_page: 2,
            initial_page_size: 4,
            initial_sort: Some(SortSpec::descending("id")),
            search_keys: None,
        };
        let state = TableState::with_options(numbered(10), options);
        assert_eq!(ids(&state.paginated_data()), vec![6, 5, 4, 3]);
    }

    #[test]
    fn test_loading_and_error_flags() {
        let mut state = TableState::new(Vec::new());
        state.set_loading(true);
        state.set_error(Some("Failed to fetch data".to_string()));
        assert!(state.is_loading());
        assert_eq!(state.error(), Some("Failed to fetch data"));
    }
}
