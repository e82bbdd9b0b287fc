//! Content assembly for quire documentation sites.
//!
//! Builds the navigation/contents tree from grouped content records, groups
//! API reference pages into sidebar categories, and loads content groups
//! from a directory of markdown files.

pub mod contents;
pub mod record;
pub mod reference;
pub mod routes;
pub mod source;

pub use contents::{
    build_docs_contents, find_article, find_initial_open_topics, Article, ContentNode,
    ContentsConfig, ContentsError, DocsContents, Lookup, NextUp, Topic, DEFAULT_CONTENT_URL,
    MISSING_METADATA, MISSING_TITLE,
};
pub use record::{ContentGroup, ContentRecord, MdxNode, SortMethod, TopicMetadata};
pub use reference::{group_by_category, Category, CategoryError, CategoryItem, ReferenceEntry};
pub use routes::{build_path_from_file, build_rel_path};
pub use source::{load_groups, SourceError};
