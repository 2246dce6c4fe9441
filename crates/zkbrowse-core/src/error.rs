// ── Core error types ──
//
// User-facing errors from zkbrowse-core. Consumers never match on HTTP
// details or gateway message text; the `From<zkbrowse_api::Error>` impl
// translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach gateway at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Gateway request timed out")]
    Timeout,

    #[error("Not connected to a cluster")]
    NotConnected,

    // ── Guard errors ─────────────────────────────────────────────────
    #[error("Permission denied: cannot {operation} protected node {path}")]
    PermissionDenied { path: String, operation: String },

    #[error("Invalid node path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    // ── Namespace conditions ─────────────────────────────────────────
    #[error("Node already exists: {message}")]
    NodeExists { message: String },

    #[error("Node does not exist: {message}")]
    NoNode { message: String },

    #[error("Cluster {id} is not registered")]
    UnknownCluster { id: i64 },

    // ── Gateway errors (wrapped, not exposed raw) ────────────────────
    #[error("Gateway error: {message}")]
    Gateway { message: String },

    #[error("Gateway returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for the "node already exists" condition.
    pub fn is_node_exists(&self) -> bool {
        matches!(self, Self::NodeExists { .. })
    }

    /// Returns `true` for the "node does not exist" condition.
    pub fn is_no_node(&self) -> bool {
        matches!(self, Self::NoNode { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<zkbrowse_api::Error> for CoreError {
    fn from(err: zkbrowse_api::Error) -> Self {
        match err {
            zkbrowse_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Gateway {
                        message: e.to_string(),
                    }
                }
            }
            zkbrowse_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid gateway URL: {e}"),
            },
            zkbrowse_api::Error::Tls(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            zkbrowse_api::Error::Http { status, body } => CoreError::Http {
                status,
                message: body,
            },
            zkbrowse_api::Error::NodeExists { message } => CoreError::NodeExists { message },
            zkbrowse_api::Error::NoNode { message } => CoreError::NoNode { message },
            zkbrowse_api::Error::UnknownCluster { id } => CoreError::UnknownCluster { id },
            zkbrowse_api::Error::Gateway { message } => CoreError::Gateway { message },
            zkbrowse_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
