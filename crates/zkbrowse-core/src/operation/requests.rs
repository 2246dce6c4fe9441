// ── Typed request structs for NodeOperation payloads ──

use serde::{Deserialize, Serialize};
use zkbrowse_api::CreateMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNodeRequest {
    pub path: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub mode: CreateMode,
}

impl CreateNodeRequest {
    /// A persistent node with the given data.
    pub fn new(path: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
            mode: CreateMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: CreateMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNodeRequest {
    pub path: String,
    pub data: String,
}

impl UpdateNodeRequest {
    pub fn new(path: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}
