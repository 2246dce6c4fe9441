// ── Gateway seam ──
//
// The explorer talks to the namespace service only through this trait.
// `GatewayClient` is the production adapter; tests drive the explorer with
// an in-memory implementation.

use std::collections::BTreeMap;
use std::future::Future;

use zkbrowse_api::{ClusterInfo, CreateMode, Error, GatewayClient, NodeRecord};

/// Request/response operations of the namespace gateway.
///
/// Failures use the gateway's typed conditions: a missing node is
/// [`Error::NoNode`] and a duplicate create is [`Error::NodeExists`].
pub trait Gateway: Send + Sync + 'static {
    /// Known cluster endpoints.
    fn list_clusters(&self) -> impl Future<Output = Result<Vec<ClusterInfo>, Error>> + Send;

    /// One cluster registry record.
    fn get_cluster(&self, id: i64) -> impl Future<Output = Result<ClusterInfo, Error>> + Send;

    /// Register a cluster; returns the stored record with its id.
    fn add_cluster(
        &self,
        cluster: &ClusterInfo,
    ) -> impl Future<Output = Result<ClusterInfo, Error>> + Send;

    /// Replace a registry record. An unknown id is [`Error::UnknownCluster`].
    fn update_cluster(
        &self,
        id: i64,
        cluster: &ClusterInfo,
    ) -> impl Future<Output = Result<ClusterInfo, Error>> + Send;

    /// Drop a registry record.
    fn remove_cluster(&self, id: i64) -> impl Future<Output = Result<(), Error>> + Send;

    /// Open (or reuse) a gateway session for `address`.
    fn connect(&self, address: &str) -> impl Future<Output = Result<String, Error>> + Send;

    /// Read a node and its whole subtree; `None` reads the root.
    fn get_node(
        &self,
        cluster: &str,
        path: Option<&str>,
    ) -> impl Future<Output = Result<NodeRecord, Error>> + Send;

    /// Create one node. Missing parents are an error.
    fn create_node(
        &self,
        cluster: &str,
        path: &str,
        data: &str,
        mode: CreateMode,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Replace a node's data; `version = -1` skips the version check.
    fn update_node(
        &self,
        cluster: &str,
        path: &str,
        data: &str,
        version: i32,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Delete a single childless node.
    fn delete_node(
        &self,
        cluster: &str,
        path: &str,
        version: i32,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Every node's data under `path`, keyed by path.
    fn export_data(
        &self,
        cluster: &str,
        path: &str,
    ) -> impl Future<Output = Result<BTreeMap<String, String>, Error>> + Send;

    /// Write a path→data map, creating missing nodes.
    fn import_data(
        &self,
        cluster: &str,
        entries: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

impl Gateway for GatewayClient {
    fn list_clusters(&self) -> impl Future<Output = Result<Vec<ClusterInfo>, Error>> + Send {
        GatewayClient::list_clusters(self)
    }

    fn get_cluster(&self, id: i64) -> impl Future<Output = Result<ClusterInfo, Error>> + Send {
        GatewayClient::get_cluster(self, id)
    }

    fn add_cluster(
        &self,
        cluster: &ClusterInfo,
    ) -> impl Future<Output = Result<ClusterInfo, Error>> + Send {
        GatewayClient::add_cluster(self, cluster)
    }

    fn update_cluster(
        &self,
        id: i64,
        cluster: &ClusterInfo,
    ) -> impl Future<Output = Result<ClusterInfo, Error>> + Send {
        GatewayClient::update_cluster(self, id, cluster)
    }

    fn remove_cluster(&self, id: i64) -> impl Future<Output = Result<(), Error>> + Send {
        GatewayClient::remove_cluster(self, id)
    }

    fn connect(&self, address: &str) -> impl Future<Output = Result<String, Error>> + Send {
        GatewayClient::connect(self, address)
    }

    fn get_node(
        &self,
        cluster: &str,
        path: Option<&str>,
    ) -> impl Future<Output = Result<NodeRecord, Error>> + Send {
        GatewayClient::get_node(self, cluster, path)
    }

    fn create_node(
        &self,
        cluster: &str,
        path: &str,
        data: &str,
        mode: CreateMode,
    ) -> impl Future<Output = Result<(), Error>> + Send {
        GatewayClient::create_node(self, cluster, path, data, mode)
    }

    fn update_node(
        &self,
        cluster: &str,
        path: &str,
        data: &str,
        version: i32,
    ) -> impl Future<Output = Result<(), Error>> + Send {
        GatewayClient::update_node(self, cluster, path, data, version)
    }

    fn delete_node(
        &self,
        cluster: &str,
        path: &str,
        version: i32,
    ) -> impl Future<Output = Result<(), Error>> + Send {
        GatewayClient::delete_node(self, cluster, path, version)
    }

    fn export_data(
        &self,
        cluster: &str,
        path: &str,
    ) -> impl Future<Output = Result<BTreeMap<String, String>, Error>> + Send {
        GatewayClient::export_data(self, cluster, path)
    }

    fn import_data(
        &self,
        cluster: &str,
        entries: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<(), Error>> + Send {
        GatewayClient::import_data(self, cluster, entries)
    }
}
