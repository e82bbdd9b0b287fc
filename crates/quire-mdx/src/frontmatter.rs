//! Frontmatter extraction and parsing.

use serde::{Deserialize, Serialize};

/// Parsed frontmatter from an MDX file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Frontmatter {
    /// Page title
    #[serde(default)]
    pub title: Option<String>,

    /// Page description, shown in navigation cards and SEO tags
    #[serde(default)]
    pub description: Option<String>,

    /// Order within the containing topic (lower = first)
    #[serde(default)]
    pub order: Option<i32>,
}

/// Split a leading `---` fenced YAML block off `source`.
///
/// Returns `None` for documents without a block. Both fences must be lines
/// of their own; an empty block yields default frontmatter. The remaining
/// content has leading whitespace trimmed.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    let Some(after_open) = strip_fence(trimmed) else {
        return Ok((None, source));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = after_open[..offset].trim();
            let remaining = &after_open[offset + line.len()..];

            let frontmatter = if yaml.is_empty() {
                Frontmatter::default()
            } else {
                serde_yaml::from_str(yaml)?
            };
            return Ok((Some(frontmatter), remaining.trim_start()));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unclosed)
}

const FENCE: &str = "---";

/// The text after an opening fence line, if `text` starts with one.
fn strip_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(FENCE)?;
    let (first_line, after) = rest.split_once('\n').unwrap_or((rest, ""));
    first_line.trim().is_empty().then_some(after)
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Create an Account
description: Generate a keypair and fund it on testnet
order: 1
---

# Create an Account
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title.as_deref(), Some("Create an Account"));
        assert_eq!(
            fm.description.as_deref(),
            Some("Generate a keypair and fund it on testnet")
        );
        assert_eq!(fm.order, Some(1));
        assert!(content.starts_with("# Create an Account"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn missing_title_is_allowed() {
        let source = "---\norder: 3\n---\nBody";

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title, None);
        assert_eq!(fm.order, Some(3));
        assert_eq!(content, "Body");
    }

    #[test]
    fn empty_block_yields_defaults() {
        let (fm, _) = extract_frontmatter("---\n---\nBody").unwrap();

        assert_eq!(fm, Some(Frontmatter::default()));
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn closing_fence_must_be_its_own_line() {
        let source = "---\ntitle: Dashes --- inside\n---\nBody";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert_eq!(fm.unwrap().title.as_deref(), Some("Dashes --- inside"));
        assert_eq!(content, "Body");
    }

    #[test]
    fn horizontal_rule_is_not_frontmatter() {
        let source = "----\n# Heading";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
