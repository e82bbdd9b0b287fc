//! Contents tree command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quire_contents::{build_docs_contents, load_groups, ContentGroup, DocsContents};

use super::config::{load_config, ConfigFile};
use super::{read_json, write_json};

/// Run the contents command.
pub fn run(config_path: &Path, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let contents = build_contents(&config, input.as_deref())?;

    tracing::info!(
        "Built contents with {} topics and {} articles",
        contents.topics().count(),
        contents.article_count()
    );

    write_json(&contents, output.as_deref())
}

/// Build the tree from a groups file, or from the configured docs directory.
pub(crate) fn build_contents(config: &ConfigFile, input: Option<&Path>) -> Result<DocsContents> {
    let groups: Vec<ContentGroup> = match input {
        Some(path) => read_json(path)?,
        None => load_groups(Path::new(&config.docs.dir))?,
    };

    build_docs_contents(&groups, &config.contents_config())
        .context("Failed to build contents tree")
}
