// ── Node operation API ──
//
// Every write against the namespace flows through `NodeOperation`. The
// explorer runs each variant as a composite sequence of gateway calls and
// reconciles the mirror afterwards.

pub mod requests;

pub use requests::{CreateNodeRequest, UpdateNodeRequest};

/// All write operations against a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOperation {
    /// Create `path`, creating any missing ancestors on the way. An
    /// existing leaf is overwritten.
    Create(CreateNodeRequest),
    /// Replace a node's data (last write wins).
    Update(UpdateNodeRequest),
    /// Delete a node and, recursively, every descendant.
    Delete {
        path: String,
        /// Expected version of the target; `None` skips the check.
        version: Option<i32>,
    },
}

impl NodeOperation {
    /// Short verb used in logs and error text.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Create(_) => OperationKind::Create,
            Self::Update(_) => OperationKind::Update,
            Self::Delete { .. } => OperationKind::Delete,
        }
    }

    /// The path the operation targets.
    pub fn path(&self) -> &str {
        match self {
            Self::Create(req) => &req.path,
            Self::Update(req) => &req.path,
            Self::Delete { path, .. } => path,
        }
    }
}

/// Operation discriminant without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

/// Outcome of a successful [`NodeOperation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOperationResult {
    Created {
        path: String,
        /// Ancestors that did not exist and were created on the way.
        created_parents: Vec<String>,
        /// The leaf already existed and its data was overwritten instead.
        overwritten: bool,
    },
    Updated {
        path: String,
    },
    Deleted {
        path: String,
        /// Every path removed remotely, children before parents.
        removed: Vec<String>,
    },
}
