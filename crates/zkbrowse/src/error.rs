//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use zkbrowse_config::ConfigError;
use zkbrowse_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {target}")]
    #[diagnostic(
        code(zkbrowse::connection_failed),
        help(
            "Check that the gateway is running and the cluster address is right.\n\
             Reason: {reason}\n\
             Try: zkbrowse clusters"
        )
    )]
    ConnectionFailed { target: String, reason: String },

    // ── Nodes ────────────────────────────────────────────────────────
    #[error("Node not found: {message}")]
    #[diagnostic(
        code(zkbrowse::not_found),
        help("Run: zkbrowse tree to see the namespace")
    )]
    NotFound { message: String },

    #[error("Node already exists: {message}")]
    #[diagnostic(code(zkbrowse::conflict))]
    Conflict { message: String },

    #[error("Refusing to {operation} protected path '{path}'")]
    #[diagnostic(
        code(zkbrowse::permission_denied),
        help(
            "Writes below the protected prefix are blocked.\n\
             Change protected_prefix in your profile to lift the guard."
        )
    )]
    PermissionDenied { path: String, operation: String },

    #[error("Cluster {id} is not registered")]
    #[diagnostic(
        code(zkbrowse::cluster_not_found),
        help("Run: zkbrowse clusters to see registered ids")
    )]
    ClusterNotFound { id: i64 },

    // ── Gateway ──────────────────────────────────────────────────────
    #[error("Gateway error ({code}): {message}")]
    #[diagnostic(code(zkbrowse::gateway_error))]
    Gateway { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(zkbrowse::validation))]
    Validation { field: String, reason: String },

    #[error("No cluster selected")]
    #[diagnostic(
        code(zkbrowse::no_cluster),
        help(
            "Pass --cluster host:port, set ZKBROWSE_CLUSTER, or add `cluster` to your profile.\n\
             Run: zkbrowse clusters to list known clusters"
        )
    )]
    NoCluster,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(zkbrowse::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: zkbrowse config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No gateway configured")]
    #[diagnostic(
        code(zkbrowse::no_config),
        help(
            "Create a profile with: zkbrowse config init\n\
             Or pass --gateway http://host:port\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(zkbrowse::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(zkbrowse::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(zkbrowse::timeout),
        help("Increase timeout with --timeout or check gateway responsiveness.")
    )]
    Timeout,

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(zkbrowse::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(zkbrowse::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::ClusterNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NoCluster
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Gateway { .. }
            | Self::NoConfig { .. }
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                target: url,
                reason,
            },
            CoreError::Timeout => Self::Timeout,
            CoreError::NotConnected => Self::NoCluster,
            CoreError::PermissionDenied { path, operation } => {
                Self::PermissionDenied { path, operation }
            }
            CoreError::InvalidPath { path, reason } => Self::Validation {
                field: "path".into(),
                reason: format!("'{path}' {reason}"),
            },
            CoreError::NodeExists { message } => Self::Conflict { message },
            CoreError::NoNode { message } => Self::NotFound { message },
            CoreError::UnknownCluster { id } => Self::ClusterNotFound { id },
            CoreError::Gateway { message } => Self::Gateway {
                code: "gateway".into(),
                message,
            },
            CoreError::Http { status, message } if status >= 500 => Self::ConnectionFailed {
                target: "gateway".into(),
                reason: format!("HTTP {status}: {message}"),
            },
            CoreError::Http { status, message } => Self::Gateway {
                code: format!("http_{status}"),
                message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Gateway {
                code: "internal".into(),
                message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
