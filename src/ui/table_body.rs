//! Table body view model
//!
//! Resolves which columns to show and how their headers read, which of the
//! loading/error/empty/rows states the body is in, and the per-row keys,
//! cell text and actions.

use std::fmt;
use std::sync::Arc;

use crate::config::config::TableConfig;
use crate::data::column_inference::{infer_columns, ColumnOptions, ColumnSpec};
use crate::data::record::Record;
use crate::data::sort::{SortDirection, SortSpec};
use crate::data::table_state::TableState;
use crate::ui::actions::{visible_actions, RowAction};
use crate::ui::cell_renderer::CellRenderer;

/// Computes a stable key for a row from the record and its index on the page
pub type KeyExtractor = Arc<dyn Fn(&Record, usize) -> String + Send + Sync>;

/// Explicit columns win; otherwise infer from the data when allowed
pub fn resolve_columns(
    explicit: &[ColumnSpec],
    auto_generate: bool,
    records: &[Record],
    options: &ColumnOptions,
) -> Vec<ColumnSpec> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }
    if auto_generate && !records.is_empty() {
        return infer_columns(records, options);
    }
    Vec::new()
}

/// Columns for the page `table` currently shows. Inference samples the
/// first record of that page, not of the whole collection.
pub fn resolve_page_columns(
    explicit: &[ColumnSpec],
    auto_generate: bool,
    table: &TableState,
    options: &ColumnOptions,
) -> Vec<ColumnSpec> {
    let sample: Vec<Record> = table
        .paginated_data()
        .first()
        .map(|record| (*record).clone())
        .into_iter()
        .collect();
    resolve_columns(explicit, auto_generate, &sample, options)
}

/// One column header as the table shows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    /// Direction when the table is currently sorted by this column
    pub sort: Option<SortDirection>,
}

impl HeaderCell {
    /// Sort marker for sortable columns: `↕` when unsorted, `↑`/`↓` otherwise
    pub fn indicator(&self) -> Option<&'static str> {
        if !self.sortable {
            return None;
        }
        Some(match self.sort {
            None => "↕",
            Some(SortDirection::Ascending) => "↑",
            Some(SortDirection::Descending) => "↓",
        })
    }

    /// Header text with the sort marker appended, if any
    pub fn label(&self) -> String {
        match self.indicator() {
            Some(marker) => format!("{} {}", self.header, marker),
            None => self.header.clone(),
        }
    }
}

pub fn header_cells(columns: &[ColumnSpec], sort: Option<&SortSpec>) -> Vec<HeaderCell> {
    columns
        .iter()
        .map(|column| HeaderCell {
            key: column.key.clone(),
            header: column.header.clone(),
            sortable: column.sortable,
            sort: sort
                .filter(|spec| spec.key == column.key)
                .map(|spec| spec.direction),
        })
        .collect()
}

/// What the body shows, in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyState {
    Loading,
    Error(String),
    Empty(String),
    Rows,
}

impl BodyState {
    pub fn shows_pagination(&self) -> bool {
        matches!(self, BodyState::Rows)
    }
}

pub fn resolve_body_state(
    is_loading: bool,
    error: Option<&str>,
    row_count: usize,
    empty_message: &str,
) -> BodyState {
    if is_loading {
        BodyState::Loading
    } else if let Some(message) = error {
        BodyState::Error(message.to_string())
    } else if row_count == 0 {
        BodyState::Empty(empty_message.to_string())
    } else {
        BodyState::Rows
    }
}

/// Cells a full-width message row must span
pub fn column_span(column_count: usize, has_actions: bool) -> usize {
    column_count + usize::from(has_actions)
}

pub fn row_key(
    record: &Record,
    index: usize,
    extractor: Option<&KeyExtractor>,
    id_field: &str,
) -> String {
    if let Some(extract) = extractor {
        return extract(record, index);
    }
    match record.present(id_field) {
        Some(id) => id.to_string(),
        None => index.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub key: String,
    pub cells: Vec<String>,
    /// Labels of the actions offered for this row
    pub actions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RenderedBody {
    pub header: Vec<HeaderCell>,
    /// Label of the trailing actions column, present when actions are configured
    pub actions_header: Option<String>,
    pub state: BodyState,
    pub rows: Vec<RenderedRow>,
    pub column_span: usize,
}

pub struct TableBody {
    columns: Vec<ColumnSpec>,
    actions: Vec<RowAction>,
    renderer: CellRenderer,
    key_extractor: Option<KeyExtractor>,
    id_field: String,
    empty_message: String,
    actions_label: String,
}

impl TableBody {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self::from_config(columns, &TableConfig::default())
    }

    pub fn from_config(columns: Vec<ColumnSpec>, config: &TableConfig) -> Self {
        Self {
            columns,
            actions: Vec::new(),
            renderer: CellRenderer::default(),
            key_extractor: None,
            id_field: config.id_field.clone(),
            empty_message: config.empty_message.clone(),
            actions_label: config.actions_label.clone(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<RowAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_actions_label(mut self, label: impl Into<String>) -> Self {
        self.actions_label = label.into();
        self
    }

    pub fn with_renderer(mut self, renderer: CellRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_key_extractor<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&Record, usize) -> String + Send + Sync + 'static,
    {
        self.key_extractor = Some(Arc::new(extractor));
        self
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn actions(&self) -> &[RowAction] {
        &self.actions
    }

    /// Find the action with `label` offered for `record`
    pub fn action_for(&self, record: &Record, label: &str) -> Option<&RowAction> {
        visible_actions(&self.actions, record)
            .into_iter()
            .find(|action| action.label == label)
    }

    pub fn render_rows(&self, records: &[&Record]) -> Vec<RenderedRow> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| RenderedRow {
                key: row_key(record, index, self.key_extractor.as_ref(), &self.id_field),
                cells: self.renderer.render_row(&self.columns, record),
                actions: visible_actions(&self.actions, record)
                    .into_iter()
                    .map(|action| action.label.clone())
                    .collect(),
            })
            .collect()
    }

    /// Render the current page of `table`. Rows are only produced in the
    /// `Rows` state.
    pub fn render(&self, table: &TableState) -> RenderedBody {
        let page = table.paginated_data();
        let state = resolve_body_state(
            table.is_loading(),
            table.error(),
            page.len(),
            &self.empty_message,
        );
        let rows = if state == BodyState::Rows {
            self.render_rows(&page)
        } else {
            Vec::new()
        };

        RenderedBody {
            header: header_cells(&self.columns, table.sort_config()),
            actions_header: (!self.actions.is_empty()).then(|| self.actions_label.clone()),
            state,
            rows,
            column_span: column_span(self.columns.len(), !self.actions.is_empty()),
        }
    }
}

impl fmt::Debug for TableBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableBody")
            .field("columns", &self.columns)
            .field("actions", &self.actions)
            .field("id_field", &self.id_field)
            .field("custom_keys", &self.key_extractor.is_some())
            .finish()
    }
}
