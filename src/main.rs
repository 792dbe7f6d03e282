use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use std::path::PathBuf;

use table_view::config::config::Config;
use table_view::data::column_inference::{ColumnOptions, ColumnSpec};
use table_view::data::loaders::load_json_records;
use table_view::data::table_state::{TableOptions, TableState};
use table_view::logging::init_tracing;
use table_view::ui::cell_renderer::CellRenderer;
use table_view::ui::pager::Pager;
use table_view::ui::table_body::{resolve_page_columns, BodyState, TableBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Search, sort and page through a JSON array of records
#[derive(Debug, Parser)]
#[command(name = "table-view", version, about)]
struct Cli {
    /// JSON file holding an array of objects
    file: PathBuf,

    /// Case-insensitive substring to search for
    #[arg(long)]
    search: Option<String>,

    /// Only search these fields (repeatable)
    #[arg(long = "search-key", value_name = "KEY")]
    search_keys: Vec<String>,

    /// Field to sort by
    #[arg(long, value_name = "KEY")]
    sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Page to show, starting at 1
    #[arg(long)]
    page: Option<usize>,

    /// Rows per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Fields to leave out of the inferred columns (repeatable)
    #[arg(long, value_name = "KEY")]
    exclude: Vec<String>,

    /// Header override as key=Header (repeatable)
    #[arg(long, value_name = "KEY=HEADER", value_parser = parse_label)]
    label: Vec<(String, String)>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Print the last N log entries to stderr when done
    #[arg(long, value_name = "N")]
    show_logs: Option<usize>,
}

fn parse_label(raw: &str) -> Result<(String, String), String> {
    let (key, header) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=Header, got '{}'", raw))?;
    if key.is_empty() {
        return Err("label key must not be empty".to_string());
    }
    Ok((key.to_string(), header.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let filter = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let logs = init_tracing(filter)?;

    let records = load_json_records(&cli.file)?;
    tracing::info!(target: "loader", "Loaded {} records from {:?}", records.len(), cli.file);

    let mut column_options = ColumnOptions {
        exclude_columns: config.table.exclude_columns.clone(),
        ..ColumnOptions::default()
    };
    for key in &cli.exclude {
        column_options = column_options.exclude(key.clone());
    }
    for (key, header) in &cli.label {
        column_options = column_options.label(key.clone(), header.clone());
    }

    let mut options = TableOptions::from_config(&config.table);
    if !cli.search_keys.is_empty() {
        options.search_keys = Some(cli.search_keys.clone());
    }

    let mut state = TableState::with_options(records, options);
    if let Some(key) = &cli.sort {
        state.set_sort(key);
        if cli.desc {
            state.set_sort(key);
        }
    }
    if let Some(term) = &cli.search {
        state.set_search_term(term.clone());
    }
    if let Some(size) = cli.page_size {
        state.set_page_size(size);
    }
    // Page last: the other mutators reset it to 1
    if let Some(page) = cli.page {
        state.set_page(page);
    }

    let columns = resolve_page_columns(
        &[],
        config.table.auto_generate_columns,
        &state,
        &column_options,
    );

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&state.view())
                .context("Failed to serialize table view")?;
            println!("{}", json);
        }
        OutputFormat::Table => print_table(&state, columns, &config),
    }

    if let Some(count) = cli.show_logs {
        for line in logs.format_recent(count) {
            eprintln!("{}", line);
        }
    }

    Ok(())
}

fn print_table(state: &TableState, columns: Vec<ColumnSpec>, config: &Config) {
    let body = TableBody::from_config(columns, &config.table)
        .with_renderer(CellRenderer::new(&config.display));
    let rendered = body.render(state);

    match &rendered.state {
        BodyState::Loading => println!("Loading..."),
        BodyState::Error(message) => println!("Error: {}", message),
        BodyState::Empty(message) => println!("{}", message),
        BodyState::Rows => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            let mut headers: Vec<Cell> = rendered
                .header
                .iter()
                .map(|h| Cell::new(h.label()).add_attribute(Attribute::Bold))
                .collect();
            if let Some(label) = &rendered.actions_header {
                headers.push(Cell::new(label).add_attribute(Attribute::Bold));
            }
            table.set_header(headers);
            for row in &rendered.rows {
                let mut cells = row.cells.clone();
                if rendered.actions_header.is_some() {
                    cells.push(row.actions.join(" | "));
                }
                table.add_row(cells);
            }
            println!("{table}");
        }
    }

    let pager = Pager::new(state.pagination())
        .with_item_label(config.table.item_label.clone())
        .with_max_visible_pages(config.table.max_visible_pages)
        .with_page_size_options(config.table.page_size_options.clone());
    if rendered.state.shows_pagination() && pager.is_visible() {
        println!("\n{}", pager.summary());
        println!("{}", pager.render_line());
    }
}
