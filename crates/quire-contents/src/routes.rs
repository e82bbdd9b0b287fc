//! Path and URL helpers.

/// Strip the docs root from a directory, producing the topic path.
///
/// `docs/guides` with root `docs` becomes `/guides`; the root itself becomes `/`.
pub fn build_rel_path(directory: &str, root_dir: &str) -> String {
    let root = root_dir.trim_matches('/');
    let dir = directory.trim_matches('/');

    let rel = if root.is_empty() {
        dir
    } else if dir == root {
        ""
    } else {
        dir.strip_prefix(root)
            .filter(|rest| rest.starts_with('/'))
            .unwrap_or(dir)
    };

    let rel = rel.trim_matches('/');
    if rel.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", rel)
    }
}

/// Page URL for a content file.
///
/// `docs/guides/intro.mdx` becomes `{base_url}docs/guides/intro/`; index
/// files map to their directory.
pub fn build_path_from_file(relative_path: &str, base_url: &str) -> String {
    let path = relative_path.trim_start_matches('/');
    let without_ext = match path.rsplit_once('.') {
        Some((head, ext)) if !ext.contains('/') && !head.is_empty() => head,
        _ => path,
    };

    let page = if without_ext == "index" {
        ""
    } else {
        without_ext.strip_suffix("/index").unwrap_or(without_ext)
    };

    let base = base_url.trim_end_matches('/');
    if page.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}/", base, page)
    }
}

/// Map keys for each level of a topic path: `/a/b` yields `["/a", "/b"]`.
pub(crate) fn topic_keys(rel_path: &str) -> Vec<String> {
    let keys: Vec<String> = rel_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| format!("/{}", s))
        .collect();

    if keys.is_empty() {
        vec!["/".to_string()]
    } else {
        keys
    }
}
