// ── Explorer ──
//
// Owns one session against the gateway: the current cluster, the mirror,
// and every operation that reads or writes the remote namespace. Composite
// writes run their gateway calls sequentially and reconcile the mirror
// afterwards.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::{debug, info, warn};
use zkbrowse_api::{ClusterInfo, CreateMode, GatewayClient};

use crate::config::ExplorerConfig;
use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::model::Node;
use crate::operation::{
    CreateNodeRequest, NodeOperation, NodeOperationResult, UpdateNodeRequest,
};
use crate::path;
use crate::store::{NodeTree, TreeStore, process_nodes};
use crate::stream::TreeStream;

/// Version sent when the caller does not pin one.
const ANY_VERSION: i32 = -1;

// ── Explorer ─────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ExplorerInner>`. Generic over the gateway so
/// the same engine runs against the HTTP client or an in-memory fake.
pub struct Explorer<G: Gateway = GatewayClient> {
    inner: Arc<ExplorerInner<G>>,
}

struct ExplorerInner<G> {
    gateway: G,
    config: ExplorerConfig,
    store: TreeStore,
}

impl<G: Gateway> Clone for Explorer<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Explorer<GatewayClient> {
    /// Build an explorer backed by the HTTP gateway client. Does NOT
    /// connect; call [`connect()`](Self::connect) with a cluster address.
    pub fn new(config: ExplorerConfig) -> Result<Self, CoreError> {
        let client = GatewayClient::new(config.gateway_url.clone(), &config.transport())?;
        Ok(Self::with_gateway(client, config))
    }
}

impl<G: Gateway> Explorer<G> {
    /// Build an explorer over any [`Gateway`] implementation.
    pub fn with_gateway(gateway: G, config: ExplorerConfig) -> Self {
        Self {
            inner: Arc::new(ExplorerInner {
                gateway,
                config,
                store: TreeStore::new(),
            }),
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.inner.config
    }

    pub fn gateway(&self) -> &G {
        &self.inner.gateway
    }

    /// Access the underlying store.
    pub fn store(&self) -> &TreeStore {
        &self.inner.store
    }

    // ── State observation ────────────────────────────────────────

    /// Current mirror snapshot.
    pub fn tree(&self) -> Arc<NodeTree> {
        self.inner.store.tree()
    }

    /// Subscribe to mirror changes.
    pub fn subscribe_tree(&self) -> TreeStream<NodeTree> {
        self.inner.store.subscribe_tree()
    }

    pub fn node(&self, path: &str) -> Option<Node> {
        self.inner.store.node(path)
    }

    pub fn selected_node(&self) -> Option<Node> {
        self.inner.store.selected_node()
    }

    pub fn has_selected_node(&self) -> bool {
        self.selected_node().is_some()
    }

    pub fn loading(&self) -> bool {
        self.inner.store.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.store.error()
    }

    pub fn clusters(&self) -> Arc<Vec<ClusterInfo>> {
        self.inner.store.clusters()
    }

    pub fn current_cluster(&self) -> Option<String> {
        self.inner.store.current_cluster()
    }

    pub fn is_connected(&self) -> bool {
        self.current_cluster().is_some()
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Load the known clusters.
    ///
    /// Best effort: a failure is recorded in [`error()`](Self::error) and
    /// the previous list is kept.
    pub async fn fetch_clusters(&self) -> Arc<Vec<ClusterInfo>> {
        let store = &self.inner.store;
        let _loading = store.begin_loading();
        store.set_error(None);

        match self.inner.gateway.list_clusters().await {
            Ok(clusters) => {
                debug!(count = clusters.len(), "loaded cluster list");
                store.set_clusters(clusters);
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "failed to load clusters");
                store.set_error(Some(format!("failed to load clusters: {err}")));
            }
        }
        store.clusters()
    }

    /// Read one cluster registry record.
    pub async fn cluster_record(&self, id: i64) -> Result<ClusterInfo, CoreError> {
        Ok(self.inner.gateway.get_cluster(id).await?)
    }

    /// Register a cluster, then reload [`clusters()`](Self::clusters).
    pub async fn add_cluster(&self, cluster: &ClusterInfo) -> Result<ClusterInfo, CoreError> {
        self.registry_write("register", self.inner.gateway.add_cluster(cluster))
            .await
    }

    /// Replace a cluster registry record, then reload the listing.
    pub async fn update_cluster(
        &self,
        id: i64,
        cluster: &ClusterInfo,
    ) -> Result<ClusterInfo, CoreError> {
        self.registry_write("update", self.inner.gateway.update_cluster(id, cluster))
            .await
    }

    /// Drop a cluster registry record, then reload the listing.
    ///
    /// An open session against that cluster is left alone.
    pub async fn remove_cluster(&self, id: i64) -> Result<(), CoreError> {
        self.registry_write("remove", self.inner.gateway.remove_cluster(id))
            .await
    }

    /// Connect to a cluster and load its root.
    ///
    /// Switching clusters drops the previous mirror before the new root is
    /// read.
    pub async fn connect(&self, address: &str) -> Result<(), CoreError> {
        let store = &self.inner.store;
        {
            let _loading = store.begin_loading();
            store.set_error(None);

            match self.inner.gateway.connect(address).await {
                Ok(message) => info!(cluster = address, %message, "connected"),
                Err(e) => {
                    let err = CoreError::from(e);
                    warn!(cluster = address, error = %err, "connect failed");
                    store.set_error(Some(format!("failed to connect to {address}: {err}")));
                    return Err(err);
                }
            }

            if store.current_cluster().as_deref() != Some(address) {
                store.clear_tree();
            }
            store.set_current_cluster(Some(address.to_owned()));
        }
        self.fetch_nodes().await
    }

    /// Make `cluster` current and load its tree.
    ///
    /// Connecting already reads the root, so an unchanged cluster only
    /// triggers a root reload.
    pub async fn fetch_node_tree(&self, cluster: &str) -> Result<(), CoreError> {
        if self.current_cluster().as_deref() == Some(cluster) {
            self.fetch_nodes().await
        } else {
            self.connect(cluster).await
        }
    }

    /// Re-read the root and replace the whole mirror.
    pub async fn fetch_nodes(&self) -> Result<(), CoreError> {
        let cluster = self.require_cluster()?;
        let store = &self.inner.store;
        let _loading = store.begin_loading();
        store.set_error(None);

        self.load_root(&cluster).await.inspect_err(|err| {
            warn!(%cluster, error = %err, "failed to load root");
            store.set_error(Some(format!("failed to load nodes: {err}")));
        })
    }

    /// Re-read `parent_path` and replace its children in the mirror.
    ///
    /// Returns whether the mirror changed. Gateway failures are logged,
    /// never returned; only a missing connection is an error.
    pub async fn fetch_child_nodes(&self, parent_path: &str) -> Result<bool, CoreError> {
        let cluster = self.require_cluster()?;
        self.inner.store.set_error(None);
        Ok(self.refresh_children(&cluster, parent_path).await)
    }

    /// Select a node (or clear the selection).
    pub fn set_selected_node(&self, path: Option<&str>) {
        self.inner.store.select(path);
    }

    /// Collapse a node in the mirror. No gateway call.
    pub fn collapse(&self, path: &str) -> bool {
        self.inner
            .store
            .modify_tree(|tree| tree.update_node_expand_state(path, false))
    }

    /// Forget the current cluster, the mirror, and the selection.
    pub fn disconnect(&self) {
        let store = &self.inner.store;
        if let Some(cluster) = store.current_cluster() {
            info!(%cluster, "disconnected");
        }
        store.clear_tree();
        store.set_current_cluster(None);
        store.set_error(None);
    }

    // ── Node operations ──────────────────────────────────────────

    /// Run a write operation and reconcile the mirror.
    ///
    /// Failures are recorded in [`error()`](Self::error) and returned.
    pub async fn perform_node_operation(
        &self,
        op: NodeOperation,
    ) -> Result<NodeOperationResult, CoreError> {
        let store = &self.inner.store;
        let _loading = store.begin_loading();
        store.set_error(None);

        let kind = op.kind();
        debug!(%kind, path = op.path(), "node operation");

        let result = match op {
            NodeOperation::Create(req) => self.create(req).await,
            NodeOperation::Update(req) => self.update(req).await,
            NodeOperation::Delete { path, version } => self.delete(&path, version).await,
        };

        if let Err(err) = &result {
            warn!(%kind, error = %err, "node operation failed");
            store.set_error(Some(format!("node operation failed: {kind} ({err})")));
        }
        result
    }

    /// Every node's data under `path`, keyed by path.
    pub async fn export_subtree(&self, path: &str) -> Result<BTreeMap<String, String>, CoreError> {
        let cluster = self.require_cluster()?;
        let store = &self.inner.store;
        let _loading = store.begin_loading();
        store.set_error(None);

        let result = self.export(&cluster, path).await;
        match &result {
            Ok(entries) => debug!(path, count = entries.len(), "exported subtree"),
            Err(err) => store.set_error(Some(format!("export failed: {err}"))),
        }
        result
    }

    /// Write a path→data map and resynchronise the whole mirror.
    ///
    /// Refused without any gateway call if an entry is malformed or falls
    /// inside the protected subtree.
    pub async fn import_data(&self, entries: &BTreeMap<String, String>) -> Result<usize, CoreError> {
        let cluster = self.require_cluster()?;
        let store = &self.inner.store;
        let _loading = store.begin_loading();
        store.set_error(None);

        let result = self.import(&cluster, entries).await;
        if let Err(err) = &result {
            warn!(error = %err, "import failed");
            store.set_error(Some(format!("import failed: {err}")));
        }
        result
    }

    // ── Internals ────────────────────────────────────────────────

    fn require_cluster(&self) -> Result<String, CoreError> {
        self.current_cluster().ok_or(CoreError::NotConnected)
    }

    fn guard(&self, target: &str, operation: &str) -> Result<(), CoreError> {
        if self.inner.config.is_protected(target) {
            return Err(CoreError::PermissionDenied {
                path: target.to_owned(),
                operation: operation.to_owned(),
            });
        }
        Ok(())
    }

    async fn registry_write<T>(
        &self,
        action: &str,
        call: impl Future<Output = Result<T, zkbrowse_api::Error>>,
    ) -> Result<T, CoreError> {
        let store = &self.inner.store;
        let result = {
            let _loading = store.begin_loading();
            store.set_error(None);
            call.await.map_err(CoreError::from)
        };

        match result {
            Ok(value) => {
                debug!(action, "cluster registry changed");
                self.fetch_clusters().await;
                Ok(value)
            }
            Err(err) => {
                warn!(action, error = %err, "cluster registry write failed");
                store.set_error(Some(format!("failed to {action} cluster: {err}")));
                Err(err)
            }
        }
    }

    async fn load_root(&self, cluster: &str) -> Result<(), CoreError> {
        let record = self.inner.gateway.get_node(cluster, None).await?;
        let tree = process_nodes(std::slice::from_ref(&record));
        debug!(cluster, nodes = tree.len(), "mirror replaced");
        self.inner.store.replace_tree(tree);
        Ok(())
    }

    async fn refresh_children(&self, cluster: &str, parent_path: &str) -> bool {
        match self.inner.gateway.get_node(cluster, Some(parent_path)).await {
            Ok(record) => {
                let applied = self
                    .inner
                    .store
                    .update_children(parent_path, record.child_records());
                if !applied {
                    debug!(parent = parent_path, "parent not in mirror, discarding children");
                }
                applied
            }
            Err(e) => {
                let err = CoreError::from(e);
                if err.is_no_node() {
                    debug!(parent = parent_path, "parent vanished before refresh");
                } else {
                    warn!(parent = parent_path, error = %err, "failed to refresh children");
                }
                false
            }
        }
    }

    // ── Create ───────────────────────────────────────────────────

    async fn create(&self, req: CreateNodeRequest) -> Result<NodeOperationResult, CoreError> {
        let cluster = self.require_cluster()?;
        let target = path::normalize(&req.path)?;
        let gateway = &self.inner.gateway;
        let segments = path::prefixes(&target);

        let mut created_parents = Vec::new();
        let mut overwritten = false;

        for (idx, segment) in segments.iter().enumerate() {
            let is_target = idx + 1 == segments.len();
            let (data, mode) = if is_target {
                (req.data.as_str(), req.mode)
            } else {
                ("", CreateMode::Persistent)
            };

            match gateway.create_node(&cluster, segment, data, mode).await {
                Ok(()) => {
                    debug!(path = %segment, %mode, "created node");
                    if !is_target {
                        created_parents.push(segment.clone());
                    }
                }
                Err(e) if e.is_node_exists() && is_target => {
                    debug!(path = %segment, "node exists, overwriting data");
                    gateway
                        .update_node(&cluster, segment, data, ANY_VERSION)
                        .await?;
                    overwritten = true;
                }
                Err(e) if e.is_node_exists() => {
                    debug!(path = %segment, "intermediate node already exists");
                }
                Err(e) => return Err(e.into()),
            }

            if let Some(parent) = path::get_parent_path(segment) {
                self.refresh_children(&cluster, &parent).await;
            }
        }

        self.expand_ancestors(&cluster, &target).await;
        if let Some(parent) = path::get_parent_path(&target) {
            self.refresh_children(&cluster, &parent).await;
        }
        if self.inner.store.contains(&target) {
            self.inner.store.select(Some(&target));
        }

        info!(path = %target, overwritten, parents = created_parents.len(), "created");
        Ok(NodeOperationResult::Created {
            path: target,
            created_parents,
            overwritten,
        })
    }

    /// Refresh ancestor metadata root-first and mark each expanded.
    async fn expand_ancestors(&self, cluster: &str, target: &str) {
        let mut ancestors = vec![path::ROOT.to_owned()];
        ancestors.extend(path::prefixes(target));
        ancestors.pop();

        for ancestor in &ancestors {
            match self.inner.gateway.get_node(cluster, Some(ancestor)).await {
                Ok(record) => {
                    self.inner.store.modify_tree(|tree| {
                        let refreshed = tree.refresh_metadata(&record);
                        tree.update_node_expand_state(ancestor, true) || refreshed
                    });
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    warn!(path = %ancestor, error = %err, "failed to refresh ancestor");
                }
            }
        }
    }

    // ── Update ───────────────────────────────────────────────────

    async fn update(&self, req: UpdateNodeRequest) -> Result<NodeOperationResult, CoreError> {
        let cluster = self.require_cluster()?;
        let target = path::normalize(&req.path)?;
        self.guard(&target, "update")?;

        self.inner
            .gateway
            .update_node(&cluster, &target, &req.data, ANY_VERSION)
            .await?;

        match self.inner.gateway.get_node(&cluster, Some(&target)).await {
            Ok(record) => {
                self.inner.store.modify_tree(|tree| tree.overlay_node(&record));
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(path = %target, error = %err, "failed to re-read updated node");
            }
        }
        self.inner.store.select(Some(&target));

        info!(path = %target, "updated");
        Ok(NodeOperationResult::Updated { path: target })
    }

    // ── Delete ───────────────────────────────────────────────────

    async fn delete(
        &self,
        path: &str,
        version: Option<i32>,
    ) -> Result<NodeOperationResult, CoreError> {
        let cluster = self.require_cluster()?;
        let target = path::normalize(path)?;
        self.guard(&target, "delete")?;

        let mut removed = Vec::new();
        let outcome = self
            .delete_recursive(
                &cluster,
                target.clone(),
                version.unwrap_or(ANY_VERSION),
                &mut removed,
            )
            .await;

        if !removed.is_empty() {
            self.inner.store.modify_tree(|tree| {
                removed
                    .iter()
                    .fold(false, |changed, gone| tree.remove_subtree(gone) > 0 || changed)
            });
        }
        match path::get_parent_path(&target) {
            Some(parent) => {
                self.refresh_children(&cluster, &parent).await;
            }
            None => {
                if let Err(err) = self.load_root(&cluster).await {
                    warn!(error = %err, "failed to reload root");
                }
            }
        }
        outcome?;

        info!(path = %target, count = removed.len(), "deleted");
        Ok(NodeOperationResult::Deleted {
            path: target,
            removed,
        })
    }

    /// Delete `path` after all of its children, depth first.
    ///
    /// Children are read fresh from the gateway and deleted one at a time;
    /// a node with live children cannot be removed remotely.
    fn delete_recursive<'a>(
        &'a self,
        cluster: &'a str,
        path: String,
        version: i32,
        removed: &'a mut Vec<String>,
    ) -> BoxFuture<'a, Result<(), CoreError>> {
        async move {
            self.guard(&path, "delete")?;

            let record = self.inner.gateway.get_node(cluster, Some(&path)).await?;
            for child in record.child_records() {
                self.delete_recursive(cluster, child.path.clone(), ANY_VERSION, removed)
                    .await?;
            }

            self.inner
                .gateway
                .delete_node(cluster, &path, version)
                .await?;
            debug!(path = %path, "deleted node");
            removed.push(path);
            Ok(())
        }
        .boxed()
    }

    // ── Export / import ──────────────────────────────────────────

    async fn export(
        &self,
        cluster: &str,
        path: &str,
    ) -> Result<BTreeMap<String, String>, CoreError> {
        require_absolute(path)?;
        Ok(self.inner.gateway.export_data(cluster, path).await?)
    }

    async fn import(
        &self,
        cluster: &str,
        entries: &BTreeMap<String, String>,
    ) -> Result<usize, CoreError> {
        for key in entries.keys() {
            require_absolute(key)?;
            self.guard(key, "import")?;
        }

        self.inner.gateway.import_data(cluster, entries).await?;
        info!(cluster, count = entries.len(), "imported nodes");

        if let Err(err) = self.load_root(cluster).await {
            warn!(error = %err, "failed to resync after import");
        }
        Ok(entries.len())
    }
}

fn require_absolute(target: &str) -> Result<(), CoreError> {
    if target.starts_with('/') {
        Ok(())
    } else {
        Err(CoreError::InvalidPath {
            path: target.to_owned(),
            reason: "path must start with '/'".into(),
        })
    }
}
