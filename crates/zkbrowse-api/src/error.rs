use thiserror::Error;

/// Top-level error type for the `zkbrowse-api` crate.
///
/// Covers every failure mode of the gateway: transport, HTTP status,
/// envelope decoding, and the gateway's own `success: false` responses.
/// Failure messages are classified exactly once, here, so downstream
/// crates match on variants instead of re-parsing free text.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status without a parseable envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Gateway conditions ──────────────────────────────────────────
    /// The node being created already exists.
    #[error("Node already exists: {message}")]
    NodeExists { message: String },

    /// The node being read, updated or deleted does not exist.
    #[error("Node does not exist: {message}")]
    NoNode { message: String },

    /// The cluster registry has no record with this id.
    #[error("Cluster {id} is not registered")]
    UnknownCluster { id: i64 },

    /// Any other `success: false` response.
    #[error("Gateway error: {message}")]
    Gateway { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Classify a gateway failure message into a typed condition.
    ///
    /// The gateway forwards the ZooKeeper exception text verbatim, so
    /// `KeeperErrorCode = NodeExists for /a` and `... = NoNode for /a`
    /// are recognised by substring.
    pub fn from_gateway_message(message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| "operation failed".into());
        if message.contains("NodeExists") {
            Self::NodeExists { message }
        } else if message.contains("NoNode") {
            Self::NoNode { message }
        } else {
            Self::Gateway { message }
        }
    }

    /// Returns `true` if the target node already exists.
    pub fn is_node_exists(&self) -> bool {
        matches!(self, Self::NodeExists { .. })
    }

    /// Returns `true` if the target node does not exist.
    pub fn is_no_node(&self) -> bool {
        matches!(self, Self::NoNode { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
