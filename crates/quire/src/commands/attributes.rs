//! Attribute table command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quire_mdx::{parse_attribute_table, parse_mdx_with, AttributeOptions, ParseOptions};
use serde_json::{json, Value};

use super::config::load_config;
use super::write_json;

/// Run the attributes command.
pub fn run(config_path: &Path, file: &Path, lenient: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let source =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let tables = read_tables(&source, config.attribute_options(lenient))
        .with_context(|| format!("Failed to read attributes from {}", file.display()))?;

    write_json(&tables, None)
}

/// Attribute tables of a document as JSON.
///
/// A document without `<AttributeTable>` tags is read as a single bare list.
fn read_tables(source: &str, options: AttributeOptions) -> Result<Vec<Value>> {
    let doc = parse_mdx_with(source, &ParseOptions { attributes: options })?;

    if doc.attribute_tables.is_empty() {
        let attributes = parse_attribute_table(&doc.content, &options)?;
        return Ok(vec![json!({ "line": 1, "attributes": attributes })]);
    }

    Ok(doc
        .attribute_tables
        .iter()
        .map(|table| json!({ "line": table.line_number, "attributes": table.attributes }))
        .collect())
}
