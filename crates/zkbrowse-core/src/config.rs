// ── Runtime explorer configuration ──
//
// Describes *how* to reach the gateway and which subtree is off limits.
// Never touches disk: the CLI builds an `ExplorerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;
use zkbrowse_api::{TlsMode, TransportConfig};

use crate::path;

/// Default protected subtree: the namespace service's own bookkeeping.
pub const DEFAULT_PROTECTED_PREFIX: &str = "/zookeeper";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed gateways).
    DangerAcceptInvalid,
}

/// Configuration for one gateway.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Gateway root URL (e.g., `http://localhost:8080`).
    pub gateway_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout, enforced by the HTTP client.
    pub timeout: Duration,
    /// Subtree that delete, update and import refuse to touch.
    /// `None` disables the guard.
    pub protected_prefix: Option<String>,
}

impl ExplorerConfig {
    /// Configuration with defaults for everything but the URL.
    pub fn new(gateway_url: Url) -> Self {
        Self {
            gateway_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            protected_prefix: Some(DEFAULT_PROTECTED_PREFIX.to_owned()),
        }
    }

    /// Whether `target` falls inside the protected subtree.
    pub fn is_protected(&self, target: &str) -> bool {
        self.protected_prefix
            .as_deref()
            .is_some_and(|prefix| path::is_within(target, prefix))
    }

    /// Transport settings for the HTTP gateway client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
