// ── Arena-backed node mirror ──
//
// A flat map from path to node; children are stored as path lists. Every
// lookup is a single hash probe, and replacing a subtree is a walk over
// the removed paths only.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;
use zkbrowse_api::NodeRecord;

use crate::model::Node;
use crate::path;

/// The local mirror of one cluster's namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTree {
    nodes: HashMap<String, Node>,
    roots: Vec<String>,
    selected: Option<String>,
}

/// Convert gateway records (and their nested children) into a mirror.
///
/// Every node starts collapsed and unselected; `is_leaf` is derived from
/// the record's child list.
pub fn process_nodes(records: &[NodeRecord]) -> NodeTree {
    let mut tree = NodeTree::default();
    for record in records {
        tree.remove_subtree(&record.path);
        tree.roots.push(record.path.clone());
        tree.insert_record(record);
    }
    tree
}

/// Untyped entry point for raw gateway payloads.
///
/// Anything other than an array is logged and yields an empty mirror.
/// Elements that do not decode as node records are skipped.
pub fn process_value(value: &serde_json::Value) -> NodeTree {
    let Some(items) = value.as_array() else {
        warn!(kind = json_kind(value), "expected an array of node records");
        return NodeTree::default();
    };
    let records: Vec<NodeRecord> = items
        .iter()
        .filter_map(|item| match NodeRecord::deserialize(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "skipping malformed node record");
                None
            }
        })
        .collect();
    process_nodes(&records)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl NodeTree {
    // ── Lookups ──────────────────────────────────────────────────────

    /// Exact path lookup.
    pub fn find_node_by_path(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes, in gateway order.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.roots.iter().filter_map(|p| self.nodes.get(p))
    }

    /// Direct children of `path`, in gateway order. Empty when the node
    /// is unknown or its children were never fetched.
    pub fn children_of(&self, path: &str) -> Vec<&Node> {
        self.nodes
            .get(path)
            .and_then(|node| node.children.as_ref())
            .map(|kids| kids.iter().filter_map(|p| self.nodes.get(p)).collect())
            .unwrap_or_default()
    }

    /// Pre-order walk over every node, yielding `(depth, node)`.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        let stack = self
            .roots
            .iter()
            .rev()
            .map(|p| (0, p.as_str()))
            .collect();
        DepthFirst { tree: self, stack }
    }

    /// Pre-order walk over `path` and its descendants, depths relative to
    /// `path`. Empty when `path` is not in the tree.
    pub fn subtree(&self, path: &str) -> DepthFirst<'_> {
        let stack = self
            .nodes
            .get_key_value(path)
            .map(|(key, _)| (0, key.as_str()))
            .into_iter()
            .collect();
        DepthFirst { tree: self, stack }
    }

    /// Pre-order walk that only descends into expanded nodes.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Node)> {
        let mut skip_below: Option<usize> = None;
        self.depth_first().filter(move |(depth, node)| {
            if let Some(limit) = skip_below {
                if *depth > limit {
                    return false;
                }
                skip_below = None;
            }
            if !node.expanded {
                skip_below = Some(*depth);
            }
            true
        })
    }

    /// Path of the selected node, if any.
    pub fn selected_path(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected node, when it is still in the mirror.
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_deref().and_then(|p| self.nodes.get(p))
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Replace a node's children with freshly read records.
    ///
    /// Previous descendants are dropped. The parent is marked expanded.
    /// Returns `false` (and changes nothing) when the parent is unknown.
    pub fn update_node_children(&mut self, parent_path: &str, fresh: &[NodeRecord]) -> bool {
        let Some(old) = self.nodes.get(parent_path).map(|n| n.children.clone()) else {
            return false;
        };
        for child in old.into_iter().flatten() {
            self.remove_subtree(&child);
        }

        let mut paths = Vec::with_capacity(fresh.len());
        for record in fresh {
            if self.nodes.contains_key(&record.path) {
                self.remove_subtree(&record.path);
            }
            self.insert_record(record);
            paths.push(record.path.clone());
        }

        if let Some(parent) = self.nodes.get_mut(parent_path) {
            parent.is_leaf = paths.is_empty();
            parent.children = Some(paths);
            parent.expanded = true;
        }
        true
    }

    /// Toggle the expansion hint. Returns whether the node exists.
    pub fn update_node_expand_state(&mut self, path: &str, expanded: bool) -> bool {
        match self.nodes.get_mut(path) {
            Some(node) => {
                node.expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Merge a fresh record into an existing node in place.
    ///
    /// Data and metadata are replaced; materialised children stay.
    pub fn overlay_node(&mut self, record: &NodeRecord) -> bool {
        match self.nodes.get_mut(&record.path) {
            Some(node) => {
                node.overlay(record);
                true
            }
            None => false,
        }
    }

    /// Merge only a fresh record's metadata into an existing node.
    pub fn refresh_metadata(&mut self, record: &NodeRecord) -> bool {
        match self.nodes.get_mut(&record.path) {
            Some(node) => {
                node.refresh_metadata(record);
                true
            }
            None => false,
        }
    }

    /// Move the selection. Unknown paths are remembered but mark nothing.
    pub fn select(&mut self, path: Option<&str>) {
        if let Some(node) = self
            .selected
            .take()
            .and_then(|previous| self.nodes.get_mut(&previous))
        {
            node.selected = false;
        }
        self.selected = path.map(str::to_owned);
        if let Some(node) = path.and_then(|p| self.nodes.get_mut(p)) {
            node.selected = true;
        }
    }

    /// Remove `path` and everything below it, unlinking it from its
    /// parent. Returns how many nodes went.
    pub fn remove_subtree(&mut self, path: &str) -> usize {
        if let Some(parent) = path::get_parent_path(path)
            .and_then(|parent| self.nodes.get_mut(&parent))
            .and_then(|parent| parent.children.as_mut())
        {
            parent.retain(|child| child != path);
        }
        let mut removed = 0;
        let mut pending = vec![path.to_owned()];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                removed += 1;
                pending.extend(node.children.into_iter().flatten());
            }
        }
        self.roots.retain(|root| root != path);
        removed
    }

    fn insert_record(&mut self, record: &NodeRecord) {
        let mut node = Node::from_record(record);
        node.selected = self.selected.as_deref() == Some(record.path.as_str());
        self.nodes.insert(record.path.clone(), node);
        for child in record.child_records() {
            self.insert_record(child);
        }
    }
}

/// Iterator returned by [`NodeTree::depth_first`].
pub struct DepthFirst<'a> {
    tree: &'a NodeTree,
    stack: Vec<(usize, &'a str)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((depth, path)) = self.stack.pop() {
            let Some(node) = self.tree.nodes.get(path) else {
                continue;
            };
            if let Some(kids) = &node.children {
                self.stack
                    .extend(kids.iter().rev().map(|kid| (depth + 1, kid.as_str())));
            }
            return Some((depth, node));
        }
        None
    }
}
