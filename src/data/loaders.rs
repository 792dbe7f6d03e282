use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::data::record::Record;

/// Convert parsed JSON (an array of objects) into records
pub fn records_from_json(json: JsonValue) -> Result<Vec<Record>> {
    let JsonValue::Array(items) = json else {
        return Err(anyhow::anyhow!("JSON data must be an array of objects"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            JsonValue::Object(map) => Ok(Record::from(map)),
            other => Err(anyhow::anyhow!(
                "Element {} is not a JSON object: {}",
                idx,
                other
            )),
        })
        .collect()
}

/// Parse records from a JSON string
pub fn records_from_json_str(text: &str) -> Result<Vec<Record>> {
    let json: JsonValue = serde_json::from_str(text).context("Failed to parse JSON data")?;
    records_from_json(json)
}

/// Load a JSON file holding an array of objects
pub fn load_json_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open JSON file: {:?}", path))?;
    let reader = BufReader::new(file);

    let json: JsonValue = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON file: {:?}", path))?;
    let records = records_from_json(json).with_context(|| format!("In {:?}", path))?;

    debug!(target: "loader", "Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}
