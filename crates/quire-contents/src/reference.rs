//! API reference sidebar grouping.
//!
//! Reference pages carry a `directory` such as `accounts` or
//! `accounts/operations`. Pages are grouped by directory and sub-directories
//! become nested categories inside their top-level category, so the reference
//! sidebar can share the navigation behavior of the rest of the site.

use indexmap::IndexMap;
use quire_mdx::Frontmatter;
use serde::{Deserialize, Serialize};

use crate::contents::{compare_orders, MISSING_METADATA};
use crate::routes::build_path_from_file;

/// A reference page, as returned by the reference content query.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub id: String,

    /// Category path, `/`-delimited
    pub directory: String,

    /// Last segment of `directory`; derived when absent
    #[serde(default)]
    pub current_directory: Option<String>,

    #[serde(default)]
    pub frontmatter: Frontmatter,

    /// Metadata of the page's folder
    #[serde(default)]
    pub folder: Option<FolderMeta>,

    /// The file the page was read from
    #[serde(default)]
    pub parent: Option<ParentFile>,
}

impl ReferenceEntry {
    fn current_directory(&self) -> &str {
        self.current_directory
            .as_deref()
            .unwrap_or_else(|| self.directory.rsplit('/').next().unwrap_or(&self.directory))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FolderMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentFile {
    pub relative_path: String,
}

/// A nested reference category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    pub directory: String,
    pub current_directory: String,
    pub order: Option<i32>,
    pub items: Vec<CategoryItem>,
}

/// A sidebar item: a page or a nested category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryItem {
    Entry(ReferenceEntry),
    Category(Category),
}

impl CategoryItem {
    fn order(&self) -> Option<i32> {
        match self {
            CategoryItem::Entry(entry) => entry.frontmatter.order,
            CategoryItem::Category(category) => category.order,
        }
    }
}

/// Errors from [`group_by_category`].
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Category {directory} appears before its top-level category {category}")]
    OutOfOrder { directory: String, category: String },

    #[error("Category {directory} has no parent category {parent}")]
    MissingParent { directory: String, parent: String },
}

/// Group reference pages into top-level categories with nested sub-categories.
///
/// Directories are processed in order of first appearance. A sub-category
/// must come after the category that contains it; input that violates this
/// is rejected instead of being grouped incorrectly.
pub fn group_by_category(
    entries: &[ReferenceEntry],
    base_url: &str,
) -> Result<IndexMap<String, Vec<CategoryItem>>, CategoryError> {
    let mut by_directory: IndexMap<&str, Vec<&ReferenceEntry>> = IndexMap::new();
    for entry in entries {
        by_directory
            .entry(entry.directory.as_str())
            .or_default()
            .push(entry);
    }

    let mut categories: IndexMap<String, Vec<CategoryItem>> = IndexMap::new();

    for (directory, items) in by_directory {
        let segments: Vec<&str> = directory.split('/').collect();
        let category_name = segments[0];

        if segments.len() == 1 {
            let items = items
                .into_iter()
                .map(|entry| CategoryItem::Entry(href_as_id(entry, base_url)))
                .collect();
            categories.insert(category_name.to_string(), items);
            continue;
        }

        let top = categories
            .get_mut(category_name)
            .ok_or_else(|| CategoryError::OutOfOrder {
                directory: directory.to_string(),
                category: category_name.to_string(),
            })?;

        let nested = nested_category(directory, &items, base_url);
        let parent_directory = segments[..segments.len() - 1].join("/");

        if parent_directory == category_name {
            top.push(CategoryItem::Category(nested));
        } else {
            let parent = find_category_mut(top, &parent_directory).ok_or_else(|| {
                CategoryError::MissingParent {
                    directory: directory.to_string(),
                    parent: parent_directory.clone(),
                }
            })?;
            parent.items.push(CategoryItem::Category(nested));
            parent
                .items
                .sort_by(|a, b| compare_orders(a.order(), b.order()));
        }

        tracing::debug!("Nested reference category {}", directory);
    }

    Ok(categories)
}

/// Reference pages use their URL as id so sidebar links route like the
/// rest of the site.
fn href_as_id(entry: &ReferenceEntry, base_url: &str) -> ReferenceEntry {
    let mut entry = entry.clone();
    if let Some(parent) = &entry.parent {
        entry.id = build_path_from_file(&parent.relative_path, base_url);
    }
    if entry.current_directory.is_none() {
        entry.current_directory = Some(entry.current_directory().to_string());
    }
    entry
}

fn nested_category(directory: &str, items: &[&ReferenceEntry], base_url: &str) -> Category {
    let first = items[0];
    let folder = first.folder.as_ref();

    Category {
        id: match &first.parent {
            Some(parent) => build_path_from_file(&parent.relative_path, base_url),
            None => build_path_from_file(directory, base_url),
        },
        title: folder
            .and_then(|f| f.title.clone())
            .unwrap_or_else(|| MISSING_METADATA.to_string()),
        directory: directory.to_string(),
        current_directory: first.current_directory().to_string(),
        order: match folder {
            Some(folder) => folder.order,
            None => first.frontmatter.order,
        },
        items: items
            .iter()
            .map(|entry| CategoryItem::Entry(href_as_id(entry, base_url)))
            .collect(),
    }
}

/// The nested category whose full `directory` matches.
fn find_category_mut<'a>(
    items: &'a mut [CategoryItem],
    directory: &str,
) -> Option<&'a mut Category> {
    for item in items.iter_mut() {
        if let CategoryItem::Category(category) = item {
            if category.directory == directory {
                return Some(category);
            }
            if let Some(found) = find_category_mut(&mut category.items, directory) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(directory: &str, file: &str, order: Option<i32>) -> ReferenceEntry {
        ReferenceEntry {
            id: format!("id-{}", file),
            directory: directory.to_string(),
            current_directory: None,
            frontmatter: Frontmatter {
                title: Some(file.to_string()),
                description: None,
                order,
            },
            folder: Some(FolderMeta {
                title: Some(directory.rsplit('/').next().unwrap_or(directory).to_string()),
                order,
            }),
            parent: Some(ParentFile {
                relative_path: format!("api/{}/{}.mdx", directory, file),
            }),
        }
    }

    fn ids(items: &[CategoryItem]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                CategoryItem::Entry(e) => e.id.clone(),
                CategoryItem::Category(c) => format!("category:{}", c.title),
            })
            .collect()
    }

    #[test]
    fn groups_top_level_categories() {
        let entries = vec![
            entry("accounts", "object", Some(1)),
            entry("accounts", "list", Some(2)),
            entry("ledgers", "object", Some(1)),
        ];

        let grouped = group_by_category(&entries, "/").unwrap();

        let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["accounts", "ledgers"]);
        assert_eq!(
            ids(&grouped["accounts"]),
            vec!["/api/accounts/object/", "/api/accounts/list/"]
        );
    }

    #[test]
    fn nests_direct_sub_categories() {
        let entries = vec![
            entry("a", "overview", Some(1)),
            entry("a/b", "first", Some(2)),
            entry("a/b", "second", Some(3)),
        ];

        let grouped = group_by_category(&entries, "/").unwrap();

        let items = &grouped["a"];
        assert_eq!(items.len(), 2);
        let CategoryItem::Category(b) = &items[1] else {
            panic!("expected nested category, got {:?}", items[1]);
        };
        assert_eq!(b.title, "b");
        assert_eq!(b.current_directory, "b");
        assert_eq!(b.id, "/api/a/b/first/");
        assert_eq!(ids(&b.items), vec!["/api/a/b/first/", "/api/a/b/second/"]);
    }

    #[test]
    fn nests_deeper_categories_into_their_parent() {
        let entries = vec![
            entry("a", "overview", Some(1)),
            entry("a/b", "first", Some(2)),
            entry("a/b/d", "late", Some(9)),
            entry("a/b/c", "early", Some(0)),
        ];

        let grouped = group_by_category(&entries, "/").unwrap();

        let CategoryItem::Category(b) = &grouped["a"][1] else {
            panic!("expected category b");
        };
        // Items re-sorted by order after each insertion.
        assert_eq!(
            ids(&b.items),
            vec!["category:c", "/api/a/b/first/", "category:d"]
        );
    }

    #[test]
    fn same_leaf_name_nests_under_its_own_parent() {
        let entries = vec![
            entry("a", "overview", Some(1)),
            entry("a/x", "x-page", Some(1)),
            entry("a/x/z", "xz-page", Some(1)),
            entry("a/y", "y-page", Some(2)),
            entry("a/y/z", "yz-page", Some(1)),
            entry("a/y/z/w", "w-page", Some(1)),
        ];

        let grouped = group_by_category(&entries, "/").unwrap();

        let find = |directory: &str| -> Category {
            fn walk(items: &[CategoryItem], directory: &str) -> Option<Category> {
                items.iter().find_map(|item| match item {
                    CategoryItem::Category(c) if c.directory == directory => Some(c.clone()),
                    CategoryItem::Category(c) => walk(&c.items, directory),
                    CategoryItem::Entry(_) => None,
                })
            }
            walk(&grouped["a"], directory).unwrap()
        };

        let nested_dirs = |category: &Category| -> Vec<String> {
            category
                .items
                .iter()
                .filter_map(|item| match item {
                    CategoryItem::Category(c) => Some(c.directory.clone()),
                    CategoryItem::Entry(_) => None,
                })
                .collect()
        };

        assert_eq!(nested_dirs(&find("a/x/z")), Vec::<String>::new());
        assert_eq!(nested_dirs(&find("a/y/z")), vec!["a/y/z/w"]);
        assert_eq!(nested_dirs(&find("a/x")), vec!["a/x/z"]);
    }

    #[test]
    fn sub_category_before_parent_is_rejected() {
        let entries = vec![entry("a/b", "first", Some(1)), entry("a", "overview", Some(1))];

        let result = group_by_category(&entries, "/");

        assert!(matches!(
            result,
            Err(CategoryError::OutOfOrder { ref directory, ref category })
                if directory == "a/b" && category == "a"
        ));
    }

    #[test]
    fn missing_intermediate_category_is_rejected() {
        let entries = vec![entry("a", "overview", Some(1)), entry("a/b/c", "deep", Some(1))];

        let result = group_by_category(&entries, "/");

        assert!(matches!(result, Err(CategoryError::MissingParent { .. })));
    }

    #[test]
    fn folder_less_category_uses_placeholder_title() {
        let mut sub = entry("a/b", "first", Some(4));
        sub.folder = None;
        let entries = vec![entry("a", "overview", Some(1)), sub];

        let grouped = group_by_category(&entries, "/").unwrap();

        let CategoryItem::Category(b) = &grouped["a"][1] else {
            panic!("expected category b");
        };
        assert_eq!(b.title, MISSING_METADATA);
        assert_eq!(b.order, Some(4));
    }
}
