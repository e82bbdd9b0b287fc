//! Load content groups from a directory of markdown files.
//!
//! Produces the same grouped records as the site's content query, so a
//! checkout of the docs can be turned into a contents tree without the
//! full site build. Each directory may hold a `metadata.json` with the
//! topic's `title`, `order` and `sortMethod`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rayon::prelude::*;
use walkdir::WalkDir;

use quire_mdx::{extract_frontmatter, FrontmatterError};

use crate::contents::compare_orders;
use crate::record::{ContentGroup, ContentRecord, MdxNode, MetadataFile, RecordFields, TopicMetadata};

/// Name of the per-directory metadata file.
pub const METADATA_FILE: &str = "metadata.json";

/// Errors that can occur while loading content.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Content directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid frontmatter in {path}: {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },

    #[error("Invalid metadata.json in {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Scan `content_dir` and group its markdown files by directory.
///
/// Groups are sorted by directory; records inside a group by frontmatter
/// `order` (unordered last), then by name.
pub fn load_groups(content_dir: &Path) -> Result<Vec<ContentGroup>, SourceError> {
    if !content_dir.is_dir() {
        return Err(SourceError::NotFound(content_dir.to_path_buf()));
    }

    let files: Vec<PathBuf> = WalkDir::new(content_dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext == "md" || ext == "mdx"
        })
        .collect();

    let records: Vec<ContentRecord> = files
        .par_iter()
        .map(|path| read_record(content_dir, path))
        .collect::<Result<_, _>>()?;

    let mut metadata_cache: HashMap<String, Option<TopicMetadata>> = HashMap::new();
    let mut grouped: BTreeMap<String, Vec<ContentRecord>> = BTreeMap::new();

    for mut record in records {
        let directory = record
            .relative_path
            .as_deref()
            .and_then(|p| p.rsplit_once('/'))
            .map(|(dir, _)| dir.to_string())
            .unwrap_or_default();

        if !metadata_cache.contains_key(&directory) {
            let metadata = read_metadata(&content_dir.join(&directory))?;
            metadata_cache.insert(directory.clone(), metadata);
        }
        record.fields = metadata_cache
            .get(&directory)
            .cloned()
            .flatten()
            .map(|data| RecordFields {
                metadata: MetadataFile { data },
            });

        grouped.entry(directory).or_default().push(record);
    }

    let groups: Vec<ContentGroup> = grouped
        .into_iter()
        .map(|(field_value, mut nodes)| {
            nodes.sort_by(|a, b| {
                compare_orders(a.child_mdx.frontmatter.order, b.child_mdx.frontmatter.order)
                    .then_with(|| a.name.cmp(&b.name))
            });
            ContentGroup { field_value, nodes }
        })
        .collect();

    tracing::info!(
        "Loaded {} files in {} groups from {}",
        files.len(),
        groups.len(),
        content_dir.display()
    );

    Ok(groups)
}

fn read_record(content_dir: &Path, path: &Path) -> Result<ContentRecord, SourceError> {
    let io_error = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let content = fs::read_to_string(path).map_err(io_error)?;
    let (frontmatter, _) =
        extract_frontmatter(&content).map_err(|source| SourceError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;

    let modified_time = fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|time| DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok();

    let relative = path.strip_prefix(content_dir).unwrap_or(path);
    let relative_path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string();

    Ok(ContentRecord {
        id: relative_path.clone(),
        name,
        modified_time,
        child_mdx: MdxNode {
            id: format!("{}#mdx", relative_path),
            frontmatter: frontmatter.unwrap_or_default(),
        },
        relative_path: Some(relative_path),
        fields: None,
    })
}

fn read_metadata(dir: &Path) -> Result<Option<TopicMetadata>, SourceError> {
    let path = dir.join(METADATA_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|source| SourceError::Io {
        path: path.clone(),
        source,
    })?;
    let metadata =
        serde_json::from_str(&content).map_err(|source| SourceError::Metadata { path, source })?;

    Ok(Some(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn groups_files_by_directory() {
        let temp = tempdir().unwrap();
        let root = temp.path();

        write(root, "docs/guides/metadata.json", r#"{"title": "Guides", "order": 1}"#);
        write(root, "docs/guides/b.mdx", "---\ntitle: B\norder: 2\n---\n# B");
        write(root, "docs/guides/a.mdx", "---\ntitle: A\norder: 1\n---\n# A");
        write(root, "docs/api/overview.md", "---\ntitle: Overview\n---\n");
        write(root, "docs/api/notes.txt", "ignored");

        let groups = load_groups(root).unwrap();

        let dirs: Vec<&str> = groups.iter().map(|g| g.field_value.as_str()).collect();
        assert_eq!(dirs, vec!["docs/api", "docs/guides"]);

        let guides = &groups[1];
        let names: Vec<&str> = guides.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            guides.nodes[0].relative_path.as_deref(),
            Some("docs/guides/a.mdx")
        );
        assert_eq!(
            guides.nodes[0].metadata().and_then(|m| m.title.as_deref()),
            Some("Guides")
        );
        assert!(guides.nodes[0].modified_time.is_some());

        assert!(groups[0].nodes[0].metadata().is_none());
    }

    #[test]
    fn skips_hidden_directories() {
        let temp = tempdir().unwrap();
        let root = temp.path();

        write(root, "docs/a.md", "# A");
        write(root, ".cache/b.md", "# B");

        let groups = load_groups(root).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].field_value, "docs");
    }

    #[test]
    fn reports_bad_metadata() {
        let temp = tempdir().unwrap();
        let root = temp.path();

        write(root, "docs/metadata.json", "{ not json");
        write(root, "docs/a.md", "# A");

        let result = load_groups(root);

        assert!(matches!(result, Err(SourceError::Metadata { .. })));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempdir().unwrap();

        let result = load_groups(&temp.path().join("nope"));

        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }
}
