//! Path lookup command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use quire_contents::{find_article, Lookup};

use super::config::load_config;
use super::contents::build_contents;
use super::write_json;

/// Run the lookup command. Unknown paths are an error.
pub fn run(config_path: &Path, path: &str, input: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let contents = build_contents(&config, input.as_deref())?;

    match find_article(path, &contents) {
        Some(Lookup::Root(root)) => write_json(root, None),
        Some(Lookup::Topic(topic)) => {
            tracing::debug!("{} is a topic", path);
            write_json(topic, None)
        }
        Some(Lookup::Article(article)) => write_json(article, None),
        None => anyhow::bail!("Not found: {}", path),
    }
}
