// zkbrowse-api: Async Rust client for the namespace gateway's HTTP API

pub mod client;
pub mod clusters;
pub mod error;
pub mod models;
pub mod nodes;
pub mod transport;

pub use client::GatewayClient;
pub use error::Error;
pub use models::{ClusterInfo, CreateMode, NodeRecord, Stat};
pub use transport::{TlsMode, TransportConfig};
