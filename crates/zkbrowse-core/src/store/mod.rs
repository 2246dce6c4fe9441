// ── Reactive node store ──
//
// Arena-backed mirror plus the connection state around it, with
// push-based change notification.

mod tree;
mod tree_store;

pub use tree::{DepthFirst, NodeTree, process_nodes, process_value};
pub use tree_store::{LoadingGuard, TreeStore};
