use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::pagination::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table: TableConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page for new tables
    pub default_page_size: usize,

    /// Choices offered by the page-size selector
    pub page_size_options: Vec<usize>,

    /// Page links shown before the pager collapses into ellipses
    pub max_visible_pages: usize,

    /// Field keys never turned into inferred columns
    pub exclude_columns: Vec<String>,

    /// Field used as the row key when no key extractor is given
    pub id_field: String,

    /// Noun used in "Showing 1-10 of 42 items"
    pub item_label: String,

    /// Message shown when there are no rows
    pub empty_message: String,

    /// Header of the row-actions column
    pub actions_label: String,

    /// Infer columns from the data when none are given
    pub auto_generate_columns: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Text for absent or null cells
    pub null_placeholder: String,

    pub true_label: String,
    pub false_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set, e.g. "info" or "table_view=debug"
    pub level: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![10, 25, 50, 100],
            max_visible_pages: 5,
            exclude_columns: vec!["id".to_string()],
            id_field: "id".to_string(),
            item_label: "items".to_string(),
            empty_message: "No data available".to_string(),
            actions_label: "Actions".to_string(),
            auto_generate_columns: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            null_placeholder: "-".to_string(),
            true_label: "Yes".to_string(),
            false_label: "No".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    /// when no file exists
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("table-view").join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.table.default_page_size == 0 {
            return Err(anyhow::anyhow!("table.default_page_size must be at least 1"));
        }
        if self.table.page_size_options.contains(&0) {
            return Err(anyhow::anyhow!("table.page_size_options must not contain 0"));
        }
        Ok(())
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Table View Configuration File
# Location: ~/.config/table-view/config.toml (Linux)
#           ~/Library/Application Support/table-view/config.toml (macOS)
#           %APPDATA%\table-view\config.toml (Windows)

[table]
# Rows per page for new tables
default_page_size = 10

# Choices offered by the page-size selector
page_size_options = [10, 25, 50, 100]

# Page links shown before the pager collapses into ellipses
max_visible_pages = 5

# Fields never turned into inferred columns
exclude_columns = ["id"]

# Field used as the row key
id_field = "id"

# Noun used in "Showing 1-10 of 42 items"
item_label = "items"

# Message shown when there are no rows
empty_message = "No data available"

# Header of the row-actions column
actions_label = "Actions"

# Infer columns from the first record when none are given
auto_generate_columns = true

[display]
# Text for absent or null cells
null_placeholder = "-"

# Labels for boolean cells
true_label = "Yes"
false_label = "No"

[logging]
# Used when RUST_LOG is not set
level = "warn"
"#
        .to_string()
    }
}
