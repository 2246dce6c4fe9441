//! Node cache and synchronization engine for zkbrowse.
//!
//! The [`Explorer`] mirrors a lazily-loaded subset of a remote
//! ZooKeeper-style namespace, reached through an HTTP gateway. Consumers
//! read snapshots of the mirror ([`NodeTree`]) or subscribe to changes,
//! and issue writes as [`NodeOperation`]s; the explorer runs each as a
//! sequence of gateway calls and reconciles the mirror afterwards.
//!
//! ```no_run
//! use url::Url;
//! use zkbrowse_core::{CreateNodeRequest, Explorer, ExplorerConfig, NodeOperation};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExplorerConfig::new(Url::parse("http://localhost:8080")?);
//! let explorer = Explorer::new(config)?;
//! explorer.connect("127.0.0.1:2181").await?;
//!
//! explorer
//!     .perform_node_operation(NodeOperation::Create(CreateNodeRequest::new(
//!         "/app/config/db",
//!         "jdbc:postgresql://db/app",
//!     )))
//!     .await?;
//!
//! for (depth, node) in explorer.tree().depth_first() {
//!     println!("{}{}", "  ".repeat(depth), node.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod explorer;
pub mod gateway;
pub mod model;
pub mod operation;
pub mod path;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_PROTECTED_PREFIX, ExplorerConfig, TlsVerification};
pub use error::CoreError;
pub use explorer::Explorer;
pub use gateway::Gateway;
pub use model::Node;
pub use operation::{
    CreateNodeRequest, NodeOperation, NodeOperationResult, OperationKind, UpdateNodeRequest,
};
pub use path::get_parent_path;
pub use store::{NodeTree, TreeStore, process_nodes, process_value};
pub use stream::TreeStream;

// Gateway types that appear in the public API.
pub use zkbrowse_api::{ClusterInfo, CreateMode, NodeRecord, Stat};
