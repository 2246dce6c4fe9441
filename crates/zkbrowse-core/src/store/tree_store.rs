// ── Central reactive tree store ──
//
// Holds the mirror and the connection state beside it. Every field is a
// `watch` channel; the mirror is swapped copy-on-write so readers keep a
// consistent snapshot while a write is applied.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use zkbrowse_api::{ClusterInfo, NodeRecord};

use super::tree::NodeTree;
use crate::model::Node;
use crate::stream::TreeStream;

/// Reactive store for one explorer session.
///
/// No lock is ever held across an `.await`: each mutation clones the
/// current `Arc<NodeTree>` only if a reader still holds it, applies the
/// change, and publishes the result.
pub struct TreeStore {
    tree: watch::Sender<Arc<NodeTree>>,
    clusters: watch::Sender<Arc<Vec<ClusterInfo>>>,
    current_cluster: watch::Sender<Option<String>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
    last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl TreeStore {
    pub fn new() -> Self {
        let (tree, _) = watch::channel(Arc::new(NodeTree::default()));
        let (clusters, _) = watch::channel(Arc::new(Vec::new()));
        let (current_cluster, _) = watch::channel(None);
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        let (last_full_refresh, _) = watch::channel(None);

        Self {
            tree,
            clusters,
            current_cluster,
            loading,
            error,
            last_full_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn tree(&self) -> Arc<NodeTree> {
        self.tree.borrow().clone()
    }

    pub fn clusters(&self) -> Arc<Vec<ClusterInfo>> {
        self.clusters.borrow().clone()
    }

    pub fn current_cluster(&self) -> Option<String> {
        self.current_cluster.borrow().clone()
    }

    pub fn loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn node(&self, path: &str) -> Option<Node> {
        self.tree.borrow().find_node_by_path(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.tree.borrow().contains(path)
    }

    pub fn selected_node(&self) -> Option<Node> {
        self.tree.borrow().selected_node().cloned()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_tree(&self) -> TreeStream<NodeTree> {
        TreeStream::new(self.tree.subscribe())
    }

    pub fn subscribe_clusters(&self) -> TreeStream<Vec<ClusterInfo>> {
        TreeStream::new(self.clusters.subscribe())
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Replace the whole mirror, keeping the current selection path.
    pub(crate) fn replace_tree(&self, mut fresh: NodeTree) {
        let selected = self.tree.borrow().selected_path().map(str::to_owned);
        fresh.select(selected.as_deref());
        self.tree.send_replace(Arc::new(fresh));
        self.last_full_refresh.send_replace(Some(Utc::now()));
    }

    /// Drop the mirror and the selection.
    pub(crate) fn clear_tree(&self) {
        self.tree.send_replace(Arc::new(NodeTree::default()));
    }

    /// Apply `f` to the mirror. Subscribers are notified only when `f`
    /// reports a change.
    pub(crate) fn modify_tree<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut NodeTree) -> bool,
    {
        let mut changed = false;
        self.tree.send_if_modified(|tree| {
            changed = f(Arc::make_mut(tree));
            changed
        });
        changed
    }

    pub(crate) fn update_children(&self, parent_path: &str, fresh: &[NodeRecord]) -> bool {
        self.modify_tree(|tree| tree.update_node_children(parent_path, fresh))
    }

    pub(crate) fn select(&self, path: Option<&str>) {
        self.modify_tree(|tree| {
            if tree.selected_path() == path {
                return false;
            }
            tree.select(path);
            true
        });
    }

    pub(crate) fn set_clusters(&self, clusters: Vec<ClusterInfo>) {
        self.clusters.send_replace(Arc::new(clusters));
    }

    pub(crate) fn set_current_cluster(&self, cluster: Option<String>) {
        self.current_cluster.send_replace(cluster);
    }

    pub(crate) fn set_error(&self, error: Option<String>) {
        self.error.send_replace(error);
    }

    /// Raise the loading flag until the returned guard is dropped.
    pub(crate) fn begin_loading(&self) -> LoadingGuard<'_> {
        self.loading.send_replace(true);
        LoadingGuard {
            flag: &self.loading,
        }
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_full_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_full_refresh.borrow()
    }

    /// How long ago the mirror was last replaced, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_full_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the shared loading flag on drop, whichever way the call ends.
pub struct LoadingGuard<'a> {
    flag: &'a watch::Sender<bool>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.send_replace(false);
    }
}
