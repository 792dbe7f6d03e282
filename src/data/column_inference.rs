//! Column definitions and inference from sample data

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::data::datavalue::DataValue;
use crate::data::record::Record;

/// Formats a cell value for display. Receives the raw value (which is
/// `Null` for an absent field) and the whole record.
pub type CellFormatter = Arc<dyn Fn(&DataValue, &Record) -> String + Send + Sync>;

/// Metadata describing how one field is displayed as a table column
#[derive(Clone)]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    pub formatter: Option<CellFormatter>,
    /// Styling hints passed through to the rendering layer untouched
    pub class_name: Option<String>,
    pub width: Option<String>,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            formatter: None,
            class_name: None,
            width: None,
        }
    }

    /// Column whose header is derived from the key
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let header = key_to_header(&key);
        Self::new(key, header)
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&DataValue, &Record) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .field("class_name", &self.class_name)
            .field("width", &self.width)
            .finish()
    }
}

/// Options for [`infer_columns`]
#[derive(Debug, Clone, Default)]
pub struct ColumnOptions {
    /// Field keys that never become columns
    pub exclude_columns: Vec<String>,
    /// Header overrides by field key
    pub column_labels: HashMap<String, String>,
}

impl ColumnOptions {
    pub fn exclude(mut self, key: impl Into<String>) -> Self {
        self.exclude_columns.push(key.into());
        self
    }

    pub fn label(mut self, key: impl Into<String>, header: impl Into<String>) -> Self {
        self.column_labels.insert(key.into(), header.into());
        self
    }
}

/// Turn a camelCase or snake_case key into a header.
///
/// Underscores become spaces, every ASCII upper-case letter gets a space in
/// front of it, the first character is upper-cased and the result is trimmed:
/// `fullName` → `Full Name`, `created_at` → `Created at`.
pub fn key_to_header(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        match ch {
            '_' => spaced.push(' '),
            c if c.is_ascii_uppercase() => {
                spaced.push(' ');
                spaced.push(c);
            }
            c => spaced.push(c),
        }
    }

    let mut chars = spaced.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    capitalized.trim().to_string()
}

/// Derive one sortable column per field of the first record.
///
/// Only the first record is inspected, so fields that appear only on later
/// records get no column. Field order follows the first record.
pub fn infer_columns(records: &[Record], options: &ColumnOptions) -> Vec<ColumnSpec> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    first
        .keys()
        .filter(|key| !options.exclude_columns.iter().any(|ex| ex == key))
        .map(|key| {
            let header = options
                .column_labels
                .get(key)
                .filter(|label| !label.is_empty())
                .cloned()
                .unwrap_or_else(|| key_to_header(key));
            ColumnSpec::new(key, header).sortable(true)
        })
        .collect()
}
