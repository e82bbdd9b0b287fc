//! Documentation contents tree.
//!
//! Turns the grouped records of a content query into a nested tree of
//! topics and articles:
//!
//! ```text
//! {
//!   "/guides": {                      topic (one per directory)
//!     "articles": {
//!       "intro": { .. nextUp },       article (one per file)
//!       "/tutorials": {               nested topic
//!         "articles": { .. }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Every level is ordered by the topic `order` from `metadata.json`, and each
//! article links to the next one in reading order, across topic boundaries.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::record::{ContentGroup, ContentRecord};
use crate::routes::{build_path_from_file, build_rel_path, topic_keys};

/// Title used when a topic has no `metadata.json`.
pub const MISSING_METADATA: &str = "MISSING METADATA";

/// Title used when an article has no frontmatter title.
pub const MISSING_TITLE: &str = "{`title` Not Found}";

/// Default base of "edit this page" links.
pub const DEFAULT_CONTENT_URL: &str = "https://github.com/stellar/new-docs/blob/master/content/";

/// Configuration for building the contents tree.
#[derive(Debug, Clone)]
pub struct ContentsConfig {
    /// Directory prefix stripped from group directories
    pub root_dir: String,

    /// Prefix of generated article URLs
    pub base_url: String,

    /// Base of the "edit this page" link; the record's relative path is appended
    pub content_url: Option<String>,
}

impl Default for ContentsConfig {
    fn default() -> Self {
        Self {
            root_dir: "docs".to_string(),
            base_url: "/".to_string(),
            content_url: Some(DEFAULT_CONTENT_URL.to_string()),
        }
    }
}

/// Errors that can occur while building the tree.
#[derive(Debug, thiserror::Error)]
pub enum ContentsError {
    #[error("Content group {0} has no records")]
    EmptyGroup(String),

    /// Unreachable from grouped records, which always carry a record.
    #[error("Topic {0} has no articles to link to")]
    EmptyTopic(String),

    /// An article whose name starts with `/` occupies a nested topic's key.
    #[error("Topic path {path} collides with article {key}")]
    PathConflict { path: String, key: String },
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentNode {
    Topic(Topic),
    Article(Article),
}

impl ContentNode {
    fn order(&self) -> Option<i32> {
        match self {
            ContentNode::Topic(topic) => topic.order,
            ContentNode::Article(_) => None,
        }
    }
}

/// A directory of articles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: Option<String>,
    pub title: String,
    pub topic_path: String,
    pub order: Option<i32>,
    pub articles: IndexMap<String, ContentNode>,
}

impl Topic {
    fn placeholder(topic_path: String) -> Self {
        Self {
            id: None,
            title: MISSING_METADATA.to_string(),
            topic_path,
            order: None,
            articles: IndexMap::new(),
        }
    }
}

/// A single page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub github_link: Option<String>,
    pub modified_time: Option<String>,
    pub next_up: Option<NextUp>,
}

/// Link to the following article in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextUp {
    pub title: String,
    pub url: String,
}

/// The complete, ordered contents tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DocsContents {
    topics: IndexMap<String, ContentNode>,
}

impl DocsContents {
    /// Top-level topics in display order.
    pub fn topics(&self) -> impl Iterator<Item = (&str, &Topic)> {
        self.topics.iter().filter_map(|(key, node)| match node {
            ContentNode::Topic(topic) => Some((key.as_str(), topic)),
            ContentNode::Article(_) => None,
        })
    }

    /// Top-level topic by key (e.g. `/guides`).
    pub fn get(&self, key: &str) -> Option<&Topic> {
        match self.topics.get(key) {
            Some(ContentNode::Topic(topic)) => Some(topic),
            _ => None,
        }
    }

    /// Every article, depth first, in reading order.
    pub fn articles(&self) -> Vec<&Article> {
        let mut out = Vec::new();
        collect_articles(&self.topics, &mut out);
        out
    }

    /// Number of articles in the tree.
    pub fn article_count(&self) -> usize {
        self.articles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

fn collect_articles<'a>(level: &'a IndexMap<String, ContentNode>, out: &mut Vec<&'a Article>) {
    for node in level.values() {
        match node {
            ContentNode::Article(article) => out.push(article),
            ContentNode::Topic(topic) => collect_articles(&topic.articles, out),
        }
    }
}

/// Topic fields taken from a group's first record.
struct TopicData {
    id: String,
    title: String,
    topic_path: String,
    order: Option<i32>,
}

/// Build the contents tree from grouped content records.
pub fn build_docs_contents(
    groups: &[ContentGroup],
    config: &ContentsConfig,
) -> Result<DocsContents, ContentsError> {
    let mut topics: IndexMap<String, ContentNode> = IndexMap::new();

    for group in groups {
        let first = group
            .nodes
            .first()
            .ok_or_else(|| ContentsError::EmptyGroup(group.field_value.clone()))?;
        let rel_path = build_rel_path(&group.field_value, &config.root_dir);
        let metadata = first.metadata();

        let title = match metadata.and_then(|m| m.title.clone()) {
            Some(title) => title,
            None => {
                tracing::warn!("No metadata.json title for {}", group.field_value);
                MISSING_METADATA.to_string()
            }
        };

        let mut records: Vec<&ContentRecord> = group.nodes.iter().collect();
        if metadata.is_some_and(|m| m.is_alphabetical()) {
            records.sort_by(|a, b| compare_name(&a.name, &b.name));
        }

        let mut articles = IndexMap::with_capacity(records.len());
        for record in records {
            let previous = articles.insert(
                record.name.clone(),
                ContentNode::Article(build_article(record, config)),
            );
            if previous.is_some() {
                tracing::warn!(
                    "Duplicate article {} in {}, keeping the last one",
                    record.name,
                    group.field_value
                );
            }
        }

        tracing::debug!(
            "Inserting topic {} with {} articles",
            rel_path,
            articles.len()
        );

        let data = TopicData {
            id: first.id.clone(),
            title,
            topic_path: rel_path.clone(),
            order: metadata.and_then(|m| m.order),
        };
        insert_topic(&mut topics, &topic_keys(&rel_path), "", data, articles)?;
    }

    sort_level(&mut topics);

    let mut links = Vec::new();
    collect_links(&topics, &mut links)?;
    let mut position = 0;
    assign_next_up(&mut topics, &links, &mut position);

    Ok(DocsContents { topics })
}

fn build_article(record: &ContentRecord, config: &ContentsConfig) -> Article {
    let frontmatter = &record.child_mdx.frontmatter;
    let relative_path = record.relative_path.as_deref().unwrap_or("");

    Article {
        id: record.child_mdx.id.clone(),
        title: frontmatter
            .title
            .clone()
            .unwrap_or_else(|| MISSING_TITLE.to_string()),
        description: frontmatter.description.clone(),
        url: build_path_from_file(relative_path, &config.base_url),
        github_link: match (&config.content_url, &record.relative_path) {
            (Some(base), Some(path)) => Some(format!("{}{}", base, path)),
            _ => None,
        },
        modified_time: record.modified_time.clone(),
        next_up: None,
    }
}

/// Walk `keys` down from `level`, creating placeholder topics as needed, and
/// merge the topic data and articles into the final one.
fn insert_topic(
    level: &mut IndexMap<String, ContentNode>,
    keys: &[String],
    parent_path: &str,
    data: TopicData,
    articles: IndexMap<String, ContentNode>,
) -> Result<(), ContentsError> {
    let Some((key, rest)) = keys.split_first() else {
        return Ok(());
    };

    let path = if key == "/" {
        key.clone()
    } else {
        format!("{}{}", parent_path, key)
    };

    let node = level
        .entry(key.clone())
        .or_insert_with(|| ContentNode::Topic(Topic::placeholder(path.clone())));

    let ContentNode::Topic(topic) = node else {
        return Err(ContentsError::PathConflict {
            path,
            key: key.clone(),
        });
    };

    if rest.is_empty() {
        topic.id = Some(data.id);
        topic.title = data.title;
        topic.topic_path = data.topic_path;
        topic.order = data.order;
        topic.articles.extend(articles);
        Ok(())
    } else {
        insert_topic(&mut topic.articles, rest, &path, data, articles)
    }
}

/// Stable sort by `order` at every level; unordered entries go last.
fn sort_level(level: &mut IndexMap<String, ContentNode>) {
    level.sort_by(|_, a, _, b| compare_orders(a.order(), b.order()));

    for node in level.values_mut() {
        if let ContentNode::Topic(topic) = node {
            sort_level(&mut topic.articles);
        }
    }
}

pub(crate) fn compare_orders(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare article names for alphabetical topics.
///
/// Word separators compare as spaces so `account-merge` sorts before
/// `accounts`; letters compare case-sensitively.
fn compare_name(a: &str, b: &str) -> Ordering {
    name_key(a).cmp(&name_key(b))
}

fn name_key(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect()
}

fn collect_links(
    level: &IndexMap<String, ContentNode>,
    out: &mut Vec<NextUp>,
) -> Result<(), ContentsError> {
    for node in level.values() {
        match node {
            ContentNode::Article(article) => out.push(NextUp {
                title: article.title.clone(),
                url: article.url.clone(),
            }),
            ContentNode::Topic(topic) => {
                if topic.articles.is_empty() {
                    return Err(ContentsError::EmptyTopic(topic.topic_path.clone()));
                }
                collect_links(&topic.articles, out)?;
            }
        }
    }
    Ok(())
}

fn assign_next_up(
    level: &mut IndexMap<String, ContentNode>,
    links: &[NextUp],
    position: &mut usize,
) {
    for node in level.values_mut() {
        match node {
            ContentNode::Article(article) => {
                *position += 1;
                article.next_up = links.get(*position).cloned();
            }
            ContentNode::Topic(topic) => assign_next_up(&mut topic.articles, links, position),
        }
    }
}

/// Result of a [`find_article`] lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Root(&'a DocsContents),
    Topic(&'a Topic),
    Article(&'a Article),
}

impl<'a> From<&'a ContentNode> for Lookup<'a> {
    fn from(node: &'a ContentNode) -> Self {
        match node {
            ContentNode::Topic(topic) => Lookup::Topic(topic),
            ContentNode::Article(article) => Lookup::Article(article),
        }
    }
}

/// Resolve a slash-delimited path in the tree.
///
/// Each segment matches a topic (`/seg`) first, then an article (`seg`).
/// Top-level segments that match nothing fall through to the articles of the
/// root topic `/`. An empty path returns the root; `/` returns the root
/// topic. Unknown paths return `None`.
pub fn find_article<'a>(path: &str, contents: &'a DocsContents) -> Option<Lookup<'a>> {
    if path.is_empty() {
        return Some(Lookup::Root(contents));
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some((first, rest)) = segments.split_first() else {
        return contents.topics.get("/").map(Lookup::from);
    };

    let mut current = lookup_segment(&contents.topics, first).or_else(|| {
        match contents.topics.get("/") {
            Some(ContentNode::Topic(root)) => lookup_segment(&root.articles, first),
            _ => None,
        }
    })?;

    for segment in rest {
        let ContentNode::Topic(topic) = current else {
            return None;
        };
        current = lookup_segment(&topic.articles, segment)?;
    }

    Some(Lookup::from(current))
}

fn lookup_segment<'a>(
    level: &'a IndexMap<String, ContentNode>,
    segment: &str,
) -> Option<&'a ContentNode> {
    level
        .get(&format!("/{}", segment))
        .or_else(|| level.get(segment))
}

/// Which navigation topics start expanded when `page_path` is shown.
///
/// Every topic path on the page's ancestry is `true`, every other topic
/// `false`.
pub fn find_initial_open_topics(
    groups: &[ContentGroup],
    page_path: &str,
    root_dir: &str,
) -> BTreeMap<String, bool> {
    let mut state = BTreeMap::new();

    for group in groups {
        let rel_path = build_rel_path(&group.field_value, root_dir);
        mark_open(&mut state, &rel_path, page_path);
    }

    state
}

fn mark_open(state: &mut BTreeMap<String, bool>, rel_path: &str, page_path: &str) {
    if !rel_path.is_empty() {
        *state.entry(rel_path.to_string()).or_insert(false) |= rel_path == page_path;
    }

    if page_path.split('/').count() > 2 {
        mark_open(state, parent_of(rel_path), parent_of(page_path));
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}
