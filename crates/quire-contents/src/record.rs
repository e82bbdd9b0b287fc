//! Input records, in the shape produced by the site's content query.

use quire_mdx::Frontmatter;
use serde::{Deserialize, Serialize};

/// Records sharing one directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentGroup {
    /// Directory relative to the content root, e.g. `docs/guides`
    pub field_value: String,

    /// Files in the directory, in query order
    pub nodes: Vec<ContentRecord>,
}

/// One markdown file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// File node id
    pub id: String,

    /// File name without extension
    pub name: String,

    /// Path relative to the content root, e.g. `docs/guides/intro.mdx`
    #[serde(default)]
    pub relative_path: Option<String>,

    /// Last modification time (RFC 3339)
    #[serde(default)]
    pub modified_time: Option<String>,

    /// The parsed document
    pub child_mdx: MdxNode,

    /// Directory metadata attached to the file
    #[serde(default)]
    pub fields: Option<RecordFields>,
}

impl ContentRecord {
    /// Metadata of the directory this record lives in.
    pub fn metadata(&self) -> Option<&TopicMetadata> {
        self.fields.as_ref().map(|f| &f.metadata.data)
    }
}

/// The document node of a record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MdxNode {
    pub id: String,
    #[serde(default)]
    pub frontmatter: Frontmatter,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordFields {
    pub metadata: MetadataFile,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetadataFile {
    pub data: TopicMetadata,
}

/// Contents of a directory's `metadata.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMetadata {
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sort_method: Option<SortMethod>,
}

impl TopicMetadata {
    pub fn is_alphabetical(&self) -> bool {
        self.sort_method == Some(SortMethod::Alphabetical)
    }
}

/// How articles inside a topic are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMethod {
    Alphabetical,
    /// Source order; also used for unrecognized values
    #[serde(other)]
    Insertion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_query_shape() {
        let json = r#"{
            "fieldValue": "docs/guides",
            "nodes": [{
                "id": "file-1",
                "name": "intro",
                "relativePath": "docs/guides/intro.mdx",
                "modifiedTime": "2020-05-01T00:00:00Z",
                "childMdx": {
                    "id": "mdx-1",
                    "frontmatter": { "title": "Intro", "description": "Start here" }
                },
                "fields": {
                    "metadata": {
                        "data": { "order": 2, "title": "Guides", "sortMethod": "alphabetical" }
                    }
                }
            }]
        }"#;

        let group: ContentGroup = serde_json::from_str(json).unwrap();

        assert_eq!(group.field_value, "docs/guides");
        let record = &group.nodes[0];
        assert_eq!(record.child_mdx.frontmatter.title.as_deref(), Some("Intro"));
        let metadata = record.metadata().unwrap();
        assert_eq!(metadata.order, Some(2));
        assert!(metadata.is_alphabetical());
    }

    #[test]
    fn unknown_sort_method_keeps_source_order() {
        let metadata: TopicMetadata = serde_json::from_str(r#"{"sortMethod": "date"}"#).unwrap();

        assert_eq!(metadata.sort_method, Some(SortMethod::Insertion));
        assert!(!metadata.is_alphabetical());
    }
}
