//! API reference categories command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quire_contents::{group_by_category, ReferenceEntry};

use super::config::load_config;
use super::{read_json, write_json};

/// Run the categories command.
pub fn run(config_path: &Path, input: &Path, output: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let entries: Vec<ReferenceEntry> = read_json(input)?;

    let categories = group_by_category(&entries, &config.docs.base_url)
        .with_context(|| format!("Failed to group {}", input.display()))?;

    tracing::info!(
        "Grouped {} reference pages into {} categories",
        entries.len(),
        categories.len()
    );

    write_json(&categories, output.as_deref())
}
