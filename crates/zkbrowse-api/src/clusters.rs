// Gateway cluster endpoints
//
// Cluster listing and connection live under `/api/zk`. The listing predates
// the envelope and may come back as a bare JSON array; connect always uses
// the envelope. Registry records are managed under `/api/clusters` and are
// answered as bare JSON too.

use reqwest::Method;
use tracing::debug;

use crate::client::{GatewayClient, require_data};
use crate::error::Error;
use crate::models::{ClusterInfo, ClusterListing};

impl GatewayClient {
    /// List the cluster endpoints known to the gateway.
    ///
    /// `GET /api/zk/clusters`
    pub async fn list_clusters(&self) -> Result<Vec<ClusterInfo>, Error> {
        let url = self.api_url("clusters")?;
        debug!("listing clusters");

        let resp = self.get_raw(url).await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let listing: ClusterListing =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        match listing {
            ClusterListing::Bare(clusters) => Ok(clusters),
            ClusterListing::Enveloped(envelope) if envelope.success => {
                Ok(envelope.data.unwrap_or_default())
            }
            ClusterListing::Enveloped(envelope) => {
                Err(Error::from_gateway_message(envelope.message))
            }
        }
    }

    /// Ask the gateway to open a session against `address`.
    ///
    /// `GET /api/zk/connect?address={address}`. Returns the gateway's
    /// confirmation message.
    pub async fn connect(&self, address: &str) -> Result<String, Error> {
        let url = self.api_url_with_query("connect", &[("address", address)])?;
        debug!(address, "connecting to cluster");
        let message: Option<String> = self.get(url).await?;
        Ok(message.unwrap_or_default())
    }

    // ── Registry ─────────────────────────────────────────────────────

    /// Read one registry record.
    ///
    /// `GET /api/clusters/{id}`
    pub async fn get_cluster(&self, id: i64) -> Result<ClusterInfo, Error> {
        let url = self.registry_url(&format!("/{id}"))?;
        let record = self
            .send_bare(self.registry_request(Method::GET, url))
            .await?;
        record.ok_or(Error::UnknownCluster { id })
    }

    /// Register a cluster and return the stored record (with its id).
    ///
    /// `POST /api/clusters`
    pub async fn add_cluster(&self, cluster: &ClusterInfo) -> Result<ClusterInfo, Error> {
        let url = self.registry_url("")?;
        debug!(host = %cluster.host, "registering cluster");
        let stored = self
            .send_bare(self.registry_request(Method::POST, url).json(cluster))
            .await?;
        require_data(stored, "cluster registration")
    }

    /// Replace a registry record.
    ///
    /// `PUT /api/clusters/{id}`. The registry answers `null` for an
    /// unknown id.
    pub async fn update_cluster(
        &self,
        id: i64,
        cluster: &ClusterInfo,
    ) -> Result<ClusterInfo, Error> {
        let url = self.registry_url(&format!("/{id}"))?;
        debug!(id, "updating cluster record");
        let stored = self
            .send_bare(self.registry_request(Method::PUT, url).json(cluster))
            .await?;
        stored.ok_or(Error::UnknownCluster { id })
    }

    /// Drop a registry record. Removing an unknown id is not an error.
    ///
    /// `DELETE /api/clusters/{id}`
    pub async fn remove_cluster(&self, id: i64) -> Result<(), Error> {
        let url = self.registry_url(&format!("/{id}"))?;
        debug!(id, "removing cluster record");
        let _: Option<serde_json::Value> = self
            .send_bare(self.registry_request(Method::DELETE, url))
            .await?;
        Ok(())
    }
}
