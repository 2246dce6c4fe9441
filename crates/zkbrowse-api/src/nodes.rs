// Gateway node endpoints
//
// Read (recursive subtree), create, update, delete, and the bulk
// export/import pair. All writes carry the cluster address so the gateway
// can route them to the right session.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::client::{GatewayClient, require_data};
use crate::error::Error;
use crate::models::{CreateMode, NodeRecord};

impl GatewayClient {
    /// Read a node and its full subtree.
    ///
    /// `GET /api/zk/nodes?cluster={cluster}&path={path}`. A `None` path
    /// reads the root.
    pub async fn get_node(&self, cluster: &str, path: Option<&str>) -> Result<NodeRecord, Error> {
        let mut query = vec![("cluster", cluster)];
        if let Some(path) = path {
            query.push(("path", path));
        }
        let url = self.api_url_with_query("nodes", &query)?;
        debug!(cluster, ?path, "reading node");
        let data = self.get(url).await?;
        require_data(data, "node read")
    }

    /// Create a single node. Parents are not created implicitly.
    ///
    /// `POST /api/zk/nodes`
    pub async fn create_node(
        &self,
        cluster: &str,
        path: &str,
        data: &str,
        mode: CreateMode,
    ) -> Result<(), Error> {
        let url = self.api_url("nodes")?;
        debug!(cluster, path, %mode, "creating node");
        let _: Option<serde_json::Value> = self
            .post(
                url,
                &json!({
                    "cluster": cluster,
                    "path": path,
                    "data": data,
                    "mode": mode,
                }),
            )
            .await?;
        Ok(())
    }

    /// Replace a node's data. `version = -1` skips the version check.
    ///
    /// `PUT /api/zk/nodes/update`
    pub async fn update_node(
        &self,
        cluster: &str,
        path: &str,
        data: &str,
        version: i32,
    ) -> Result<(), Error> {
        let url = self.api_url("nodes/update")?;
        debug!(cluster, path, version, "updating node");
        let _: Option<serde_json::Value> = self
            .put(
                url,
                &json!({
                    "cluster": cluster,
                    "path": path,
                    "data": data,
                    "version": version,
                }),
            )
            .await?;
        Ok(())
    }

    /// Delete a single node. `version = -1` skips the version check.
    ///
    /// `DELETE /api/zk/nodes/delete`
    pub async fn delete_node(&self, cluster: &str, path: &str, version: i32) -> Result<(), Error> {
        let url = self.api_url("nodes/delete")?;
        debug!(cluster, path, version, "deleting node");
        let _: Option<serde_json::Value> = self
            .delete(
                url,
                &json!({
                    "cluster": cluster,
                    "path": path,
                    "version": version,
                }),
            )
            .await?;
        Ok(())
    }

    /// Export every node's data under `path`, keyed by absolute path.
    ///
    /// `GET /api/zk/nodes/export?cluster={cluster}&path={path}`
    pub async fn export_data(
        &self,
        cluster: &str,
        path: &str,
    ) -> Result<BTreeMap<String, String>, Error> {
        let url =
            self.api_url_with_query("nodes/export", &[("cluster", cluster), ("path", path)])?;
        debug!(cluster, path, "exporting subtree");
        let data: Option<BTreeMap<String, String>> = self.get(url).await?;
        Ok(data.unwrap_or_default())
    }

    /// Import a path→data map. The gateway creates missing nodes and
    /// overwrites existing ones.
    ///
    /// `POST /api/zk/nodes/import?cluster={cluster}`
    pub async fn import_data(
        &self,
        cluster: &str,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        let url = self.api_url_with_query("nodes/import", &[("cluster", cluster)])?;
        debug!(cluster, count = entries.len(), "importing nodes");
        let _: Option<serde_json::Value> = self.post(url, entries).await?;
        Ok(())
    }
}
