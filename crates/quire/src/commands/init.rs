//! Initialize quire in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Sample files written under the content directory.
const SAMPLE_FILES: &[(&str, &str)] = &[
    ("docs/getting-started/metadata.json", GETTING_STARTED_METADATA),
    ("docs/getting-started/index.mdx", DEFAULT_INDEX),
    ("docs/getting-started/install.mdx", DEFAULT_INSTALL),
    ("docs/guides/metadata.json", GUIDES_METADATA),
    ("docs/guides/accounts.mdx", DEFAULT_ACCOUNTS),
];

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    run_in(Path::new("."), config_path, yes)
}

fn run_in(root: &Path, config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing quire...");

    let content_dir = root.join("content");

    if content_dir.exists() {
        if !yes {
            tracing::warn!("content/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(&content_dir).context("Failed to create content directory")?;
    }

    let config_path = root.join(config_path);
    if !config_path.exists() || yes {
        fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    for (rel, body) in SAMPLE_FILES {
        let path = content_dir.join(rel);
        if path.exists() && !yes {
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created content/{}", rel);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'quire contents' to build the contents tree.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Quire Configuration

[docs]
# Directory scanned for content
dir = "content"

# Directory prefix stripped from topic paths
root_dir = "docs"

# Prefix of generated article URLs
base_url = "/"

# Base of "edit this page" links; set to "" to disable
content_url = "https://github.com/stellar/new-docs/blob/master/content/"

[attributes]
# Validate attribute list shape
strict = true
"#;

const GETTING_STARTED_METADATA: &str = r#"{
  "title": "Getting Started",
  "order": 1
}
"#;

const GUIDES_METADATA: &str = r#"{
  "title": "Guides",
  "order": 2,
  "sortMethod": "alphabetical"
}
"#;

const DEFAULT_INDEX: &str = r#"---
title: Welcome
order: 1
---

# Welcome to Your Documentation

Each directory under `content/docs` becomes a topic. Its `metadata.json`
sets the topic title, its position and how its articles are sorted.
"#;

const DEFAULT_INSTALL: &str = r#"---
title: Installation
order: 2
---

# Installation

```bash
cargo install quire
```
"#;

const DEFAULT_ACCOUNTS: &str = r#"---
title: Accounts
description: The account record.
---

# Accounts

<AttributeTable>

- id
  - string
  - The account's public key.
- balances
  - object[]
  - Balances held by the account.
    - asset_code
      - string
      - Code of the held asset.
    - balance
      - string
      - Amount held.

</AttributeTable>
"#;
