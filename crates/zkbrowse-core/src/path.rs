// ── Namespace path helpers ──
//
// Pure functions over absolute, slash-separated node paths. The mirror
// derives parent/child relationships from these instead of storing
// back-pointers.

use crate::error::CoreError;

/// The namespace root.
pub const ROOT: &str = "/";

/// Parent of `path`, or `None` for the root and the empty path.
///
/// `None` tells callers there is no parent to refresh and the whole tree
/// should be re-read instead.
///
/// ```
/// use zkbrowse_core::path::get_parent_path;
///
/// assert_eq!(get_parent_path("/a/b/c").as_deref(), Some("/a/b"));
/// assert_eq!(get_parent_path("/a").as_deref(), Some("/"));
/// assert_eq!(get_parent_path("/"), None);
/// ```
pub fn get_parent_path(path: &str) -> Option<String> {
    if path.is_empty() || path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT.to_owned()),
        Some(idx) => Some(path[..idx].to_owned()),
        None => None,
    }
}

/// Last segment of `path`; the root is named `/`.
pub fn node_name(path: &str) -> &str {
    if path == ROOT {
        return ROOT;
    }
    path.rsplit('/').next().unwrap_or(path)
}

/// Join a parent path and a child name.
pub fn join(parent: &str, name: &str) -> String {
    if parent == ROOT {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Validate and normalise a target path for a write.
///
/// Collapses repeated and trailing slashes. Rejects relative paths and the
/// root itself, which can be neither created nor modified.
pub fn normalize(path: &str) -> Result<String, CoreError> {
    if !path.starts_with('/') {
        return Err(CoreError::InvalidPath {
            path: path.to_owned(),
            reason: "path must start with '/'".into(),
        });
    }
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(CoreError::InvalidPath {
            path: path.to_owned(),
            reason: "the root node cannot be targeted".into(),
        });
    }
    Ok(format!("/{}", segments.join("/")))
}

/// Every prefix of `path`, root-to-leaf, excluding the root.
///
/// `/a/b/c` yields `/a`, `/a/b`, `/a/b/c`.
pub fn prefixes(path: &str) -> Vec<String> {
    let mut current = String::new();
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            current.push('/');
            current.push_str(segment);
            current.clone()
        })
        .collect()
}

/// Whether `path` lies in the subtree rooted at `prefix` (inclusive).
pub fn is_within(path: &str, prefix: &str) -> bool {
    if prefix == ROOT {
        return path.starts_with('/');
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parent_paths() {
        assert_eq!(get_parent_path("/a/b/c").as_deref(), Some("/a/b"));
        assert_eq!(get_parent_path("/a").as_deref(), Some("/"));
        assert_eq!(get_parent_path("/"), None);
        assert_eq!(get_parent_path(""), None);
    }

    #[test]
    fn names_and_joins() {
        assert_eq!(node_name("/"), "/");
        assert_eq!(node_name("/a/b"), "b");
        assert_eq!(join("/", "a"), "/a");
        assert_eq!(join("/a", "b"), "/a/b");
    }

    #[test]
    fn normalize_collapses_slashes() {
        assert_eq!(normalize("/a//b/").unwrap(), "/a/b");
        assert!(matches!(normalize("a/b"), Err(CoreError::InvalidPath { .. })));
        assert!(matches!(normalize("///"), Err(CoreError::InvalidPath { .. })));
    }

    #[test]
    fn prefixes_walk_root_to_leaf() {
        assert_eq!(prefixes("/a/b/c"), vec!["/a", "/a/b", "/a/b/c"]);
        assert!(prefixes("/").is_empty());
    }

    #[test]
    fn subtree_membership_respects_segments() {
        assert!(is_within("/zookeeper", "/zookeeper"));
        assert!(is_within("/zookeeper/quota", "/zookeeper"));
        assert!(!is_within("/zookeeperish", "/zookeeper"));
        assert!(is_within("/anything", "/"));
    }
}
