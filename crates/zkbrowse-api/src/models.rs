// Gateway response types
//
// Models for the gateway's JSON API. Every endpoint except the cluster
// listing wraps its payload in the `ApiResponse<T>` envelope. Fields use
// `#[serde(default)]` liberally because the gateway omits nulls and empty
// child lists inconsistently.

use serde::{Deserialize, Deserializer, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard gateway response envelope.
///
/// ```json
/// { "success": true, "message": "optional", "data": { ... } }
/// ```
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

// ── Node ─────────────────────────────────────────────────────────────

/// One namespace entry as returned by `GET /api/zk/nodes`.
///
/// The gateway reads subtrees recursively, so `children` holds the full
/// descendant tree. It is omitted (or `null`) for nodes without children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<NodeRecord>>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stat: Option<Stat>,
    #[serde(default)]
    pub acls: Option<Vec<serde_json::Value>>,
}

impl NodeRecord {
    /// Child records, or an empty slice when the gateway sent none.
    pub fn child_records(&self) -> &[NodeRecord] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// ZooKeeper node statistics, passed through verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stat {
    pub czxid: i64,
    pub mzxid: i64,
    pub ctime: i64,
    pub mtime: i64,
    pub version: i32,
    pub cversion: i32,
    pub aversion: i32,
    pub ephemeral_owner: i64,
    pub data_length: i32,
    pub num_children: i32,
    pub pzxid: i64,
}

/// The gateway serializes `version` as a string, older builds as a number.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// ── Create mode ──────────────────────────────────────────────────────

/// ZooKeeper create mode, sent as `"PERSISTENT"` etc.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CreateMode {
    #[default]
    Persistent,
    PersistentSequential,
    Ephemeral,
    EphemeralSequential,
}

// ── Cluster ──────────────────────────────────────────────────────────

/// A known cluster endpoint.
///
/// The cluster listing returns either bare `"host:port"` strings or full
/// registry records; both land here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCluster", rename_all = "camelCase")]
pub struct ClusterInfo {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub retry_count: Option<u32>,
    pub timeout: Option<u32>,
    pub description: Option<String>,
}

impl ClusterInfo {
    /// A record with only the host set.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            host: host.into(),
            port: None,
            retry_count: None,
            timeout: None,
            description: None,
        }
    }

    /// Connect string for this cluster (`host:port`, or just `host`).
    pub fn address(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.host),
            None => self.host.clone(),
        }
    }

    /// Display name, falling back to the address.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.address())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCluster {
    Address(String),
    Record(ClusterRecord),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterRecord {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    host: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    retry_count: Option<u32>,
    #[serde(default)]
    timeout: Option<u32>,
    #[serde(default)]
    description: Option<String>,
}

impl From<RawCluster> for ClusterInfo {
    fn from(raw: RawCluster) -> Self {
        match raw {
            RawCluster::Address(host) => Self::new(host),
            RawCluster::Record(r) => Self {
                id: r.id,
                name: r.name,
                host: r.host,
                port: r.port,
                retry_count: r.retry_count,
                timeout: r.timeout,
                description: r.description,
            },
        }
    }
}

/// Cluster listing body: a bare array, or the usual envelope.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ClusterListing {
    Bare(Vec<ClusterInfo>),
    Enveloped(ApiResponse<Vec<ClusterInfo>>),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    #[test]
    fn node_record_tolerates_missing_fields() {
        let record: NodeRecord = serde_json::from_value(json!({
            "path": "/app",
            "version": 3,
            "children": null
        }))
        .unwrap();
        assert_eq!(record.path, "/app");
        assert_eq!(record.version.as_deref(), Some("3"));
        assert!(record.children.is_none());
        assert!(record.child_records().is_empty());
    }

    #[test]
    fn stat_uses_camel_case() {
        let stat: Stat = serde_json::from_value(json!({
            "version": 2,
            "ephemeralOwner": 77,
            "numChildren": 4
        }))
        .unwrap();
        assert_eq!(stat.version, 2);
        assert_eq!(stat.ephemeral_owner, 77);
        assert_eq!(stat.num_children, 4);
        assert_eq!(stat.czxid, 0);
    }

    #[test]
    fn create_mode_wire_format() {
        assert_eq!(
            serde_json::to_value(CreateMode::EphemeralSequential).unwrap(),
            json!("EPHEMERAL_SEQUENTIAL")
        );
        assert_eq!(CreateMode::Persistent.to_string(), "PERSISTENT");
        assert_eq!(
            CreateMode::from_str("ephemeral").unwrap(),
            CreateMode::Ephemeral
        );
    }

    #[test]
    fn cluster_accepts_strings_and_records() {
        let clusters: Vec<ClusterInfo> = serde_json::from_value(json!([
            "zk1:2181",
            { "id": 1, "name": "prod", "host": "10.0.0.5", "port": 2181, "retryCount": 3 }
        ]))
        .unwrap();
        assert_eq!(clusters[0].address(), "zk1:2181");
        assert_eq!(clusters[1].address(), "10.0.0.5:2181");
        assert_eq!(clusters[1].display_name(), "prod");
        assert_eq!(clusters[1].retry_count, Some(3));
    }

    #[test]
    fn cluster_record_serializes_camel_case() {
        let mut cluster = ClusterInfo::new("10.0.0.9");
        cluster.port = Some(2181);
        cluster.retry_count = Some(5);

        let value = serde_json::to_value(&cluster).unwrap();
        assert_eq!(value["host"], "10.0.0.9");
        assert_eq!(value["retryCount"], 5);
        assert!(value["id"].is_null());
    }
}
