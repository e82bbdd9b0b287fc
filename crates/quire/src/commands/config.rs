//! quire.toml loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quire_contents::{ContentsConfig, DEFAULT_CONTENT_URL};
use quire_mdx::AttributeOptions;
use serde::Deserialize;

/// Configuration file structure (quire.toml).
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub attributes: AttributesConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct DocsConfig {
    /// Directory scanned for content when no input file is given
    #[serde(default = "default_content_dir")]
    pub dir: String,
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base of "edit this page" links; an empty string disables them
    #[serde(default = "default_content_url")]
    pub content_url: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            root_dir: default_root_dir(),
            base_url: default_base_url(),
            content_url: default_content_url(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct AttributesConfig {
    #[serde(default = "default_strict")]
    pub strict: bool,
}

impl Default for AttributesConfig {
    fn default() -> Self {
        Self {
            strict: default_strict(),
        }
    }
}

fn default_content_dir() -> String {
    "content".to_string()
}
fn default_root_dir() -> String {
    "docs".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_content_url() -> Option<String> {
    Some(DEFAULT_CONTENT_URL.to_string())
}
fn default_strict() -> bool {
    true
}

impl ConfigFile {
    pub fn contents_config(&self) -> ContentsConfig {
        ContentsConfig {
            root_dir: self.docs.root_dir.clone(),
            base_url: self.docs.base_url.clone(),
            content_url: self.docs.content_url.clone().filter(|url| !url.is_empty()),
        }
    }

    pub fn attribute_options(&self, lenient: bool) -> AttributeOptions {
        AttributeOptions {
            strict: self.attributes.strict && !lenient,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("quire.toml")).unwrap();

        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.docs.dir, "content");
        assert_eq!(
            config.docs.content_url.as_deref(),
            Some("https://github.com/stellar/new-docs/blob/master/content/")
        );
        assert!(config.attributes.strict);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(
            &path,
            "[docs]\nbase_url = \"/docs/\"\ncontent_url = \"https://example.com/edit/\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let contents = config.contents_config();

        assert_eq!(contents.base_url, "/docs/");
        assert_eq!(contents.root_dir, "docs");
        assert_eq!(
            contents.content_url.as_deref(),
            Some("https://example.com/edit/")
        );
    }

    #[test]
    fn empty_content_url_disables_links() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(&path, "[docs]\ncontent_url = \"\"\n").unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.contents_config().content_url, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(&path, "[docs\ndir = ").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn lenient_flag_overrides_strict_config() {
        let config = ConfigFile::default();

        assert!(config.attribute_options(false).strict);
        assert!(!config.attribute_options(true).strict);
    }
}
