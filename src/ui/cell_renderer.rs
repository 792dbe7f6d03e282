use crate::config::config::DisplayConfig;
use crate::data::column_inference::ColumnSpec;
use crate::data::datavalue::DataValue;
use crate::data::record::Record;

/// Turns record values into cell text
#[derive(Debug, Clone)]
pub struct CellRenderer {
    null_placeholder: String,
    true_label: String,
    false_label: String,
}

impl Default for CellRenderer {
    fn default() -> Self {
        Self::new(&DisplayConfig::default())
    }
}

impl CellRenderer {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            null_placeholder: config.null_placeholder.clone(),
            true_label: config.true_label.clone(),
            false_label: config.false_label.clone(),
        }
    }

    /// Text for one cell. A column formatter, when set, sees the raw value
    /// (including `Null`) and takes precedence over the default rules.
    pub fn render(&self, column: &ColumnSpec, record: &Record) -> String {
        let value = record.value(&column.key);
        match &column.formatter {
            Some(formatter) => formatter(value, record),
            None => self.render_value(value),
        }
    }

    pub fn render_value(&self, value: &DataValue) -> String {
        match value {
            DataValue::Null => self.null_placeholder.clone(),
            DataValue::Boolean(true) => self.true_label.clone(),
            DataValue::Boolean(false) => self.false_label.clone(),
            DataValue::Array(items) => items
                .iter()
                .map(|item| item.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        }
    }

    /// Cell text for every column of a record
    pub fn render_row(&self, columns: &[ColumnSpec], record: &Record) -> Vec<String> {
        columns.iter().map(|c| self.render(c, record)).collect()
    }
}
