//! Table state for data that is paged by a server.
//!
//! Filtering, sorting and slicing happen on the other side; this state only
//! tracks what to ask for and what came back. A request is described by a
//! [`PageRequest`], answered by a [`PageResponse`], and fetched through a
//! caller-supplied [`PageSource`]. Failures are recorded as an error message
//! on the state rather than propagated.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::pagination::{total_pages, PageState, PaginationInfo};
use crate::data::record::Record;
use crate::data::sort::SortSpec;
use crate::data::table_state::TableOptions;

/// What to ask a page source for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
    pub sort: Option<SortSpec>,
    pub search: String,
}

impl PageRequest {
    /// Query parameters in wire order: `page`, `pageSize`, then
    /// `sortBy`/`sortOrder` when sorting and `search` when searching
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(sort) = &self.sort {
            pairs.push(("sortBy", sort.key.clone()));
            pairs.push(("sortOrder", sort.direction.as_str().to_string()));
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        pairs
    }

    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// One page of results as returned by a server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Anything that can answer a [`PageRequest`]
pub trait PageSource {
    fn fetch(&self, request: &PageRequest) -> Result<PageResponse<Record>>;
}

impl<F> PageSource for F
where
    F: Fn(&PageRequest) -> Result<PageResponse<Record>>,
{
    fn fetch(&self, request: &PageRequest) -> Result<PageResponse<Record>> {
        self(request)
    }
}

/// Page, sort and search state for server-paged data
#[derive(Debug, Clone)]
pub struct RemoteTableState {
    data: Vec<Record>,
    total_items: usize,
    page: PageState,
    sort: Option<SortSpec>,
    search_term: String,
    is_loading: bool,
    error: Option<String>,

    /// Set whenever the request parameters change since the last fetch
    stale: bool,
}

impl Default for RemoteTableState {
    fn default() -> Self {
        Self::new(TableOptions::default())
    }
}

impl RemoteTableState {
    /// Search keys in `options` are ignored; the server decides what to search
    pub fn new(options: TableOptions) -> Self {
        Self {
            data: Vec::new(),
            total_items: 0,
            page: PageState::new(options.initial_page, options.initial_page_size),
            sort: options.initial_sort,
            search_term: String::new(),
            is_loading: false,
            error: None,
            stale: true,
        }
    }

    /// Records of the last successful fetch
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page.page_size
    }

    pub fn sort_config(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when the parameters changed since the last fetch started
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn pagination(&self) -> PaginationInfo {
        PaginationInfo::new(self.page, self.total_items)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page.current_page = page;
        self.stale = true;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page.page_size = size;
        self.page.current_page = 1;
        self.stale = true;
    }

    /// Sort by `key`, flipping direction if it is already the sort key
    pub fn set_sort(&mut self, key: &str) {
        self.sort = Some(SortSpec::toggled(self.sort.as_ref(), key));
        self.page.current_page = 1;
        self.stale = true;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page.current_page = 1;
        self.stale = true;
    }

    /// The request for the current parameters
    pub fn request(&self) -> PageRequest {
        PageRequest {
            page: self.page.current_page,
            page_size: self.page.page_size,
            sort: self.sort.clone(),
            search: self.search_term.clone(),
        }
    }

    /// Mark a fetch as started and return its request
    pub fn begin_fetch(&mut self) -> PageRequest {
        self.is_loading = true;
        self.error = None;
        self.stale = false;
        let request = self.request();
        debug!(target: "remote_table", "Fetching {}", request.to_query_string());
        request
    }

    /// Apply the outcome of a fetch started with [`begin_fetch`](Self::begin_fetch)
    pub fn finish_fetch(&mut self, outcome: Result<PageResponse<Record>>) {
        match outcome {
            Ok(response) => {
                debug!(
                    target: "remote_table",
                    "Received {} of {} records",
                    response.data.len(),
                    response.total
                );
                self.data = response.data;
                self.total_items = response.total;
            }
            Err(e) => {
                warn!(target: "remote_table", "Fetch failed: {:#}", e);
                self.error = Some(e.to_string());
                self.data.clear();
                self.total_items = 0;
            }
        }
        self.is_loading = false;
    }

    /// Fetch the current page from `source` synchronously
    pub fn refetch<S: PageSource + ?Sized>(&mut self, source: &S) {
        let request = self.begin_fetch();
        let outcome = source.fetch(&request);
        self.finish_fetch(outcome);
    }

    /// Fetch only if the parameters changed since the last fetch
    pub fn refetch_if_stale<S: PageSource + ?Sized>(&mut self, source: &S) -> bool {
        if !self.stale {
            return false;
        }
        self.refetch(source);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sort::SortDirection;

    #[test]
    fn test_query_pairs_minimal() {
        let state = RemoteTableState::default();
        assert_eq!(state.request().to_query_string(), "page=1&pageSize=10");
    }

    #[test]
    fn test_query_pairs_with_sort_and_search() {
        let request = PageRequest {
            page: 2,
            page_size: 25,
            sort: Some(SortSpec::descending("lastLogin")),
            search: "risk & audit".to_string(),
        };
        assert_eq!(
            request.to_query_string(),
            "page=2&pageSize=25&sortBy=lastLogin&sortOrder=desc&search=risk%20%26%20audit"
        );
    }

    #[test]
    fn test_mutators_mark_stale_and_reset_page() {
        let mut state = RemoteTableState::default();
        state.begin_fetch();
        assert!(!state.is_stale());

        state.set_page(4);
        assert!(state.is_stale());
        assert_eq!(state.current_page(), 4);

        state.set_sort("name");
        assert_eq!(state.current_page(), 1);
        state.set_sort("name");
        assert_eq!(
            state.sort_config().map(|s| s.direction),
            Some(SortDirection::Descending)
        );
    }

    #[test]
    fn test_failed_fetch_clears_data() {
        let mut state = RemoteTableState::default();
        state.finish_fetch(Ok(PageResponse {
            data: vec![Record::new().with("name", "Policy A")],
            total: 31,
            page: 1,
            page_size: 10,
            total_pages: 4,
        }));
        assert_eq!(state.total_pages(), 4);

        state.begin_fetch();
        assert!(state.is_loading());
        state.finish_fetch(Err(anyhow::anyhow!("HTTP error! status: 503")));

        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("HTTP error! status: 503"));
        assert!(state.data().is_empty());
        assert_eq!(state.total_pages(), 1);
    }

    #[test]
    fn test_response_deserializes_camel_case() {
        let json = r#"{"data":[{"id":1}],"total":1,"page":1,"pageSize":10,"totalPages":1}"#;
        let response: PageResponse<Record> = serde_json::from_str(json).unwrap();
        assert_eq!(response.page_size, 10);
        assert_eq!(response.data[0].value("id").to_string(), "1");
    }
}
