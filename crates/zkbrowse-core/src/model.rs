// ── Mirror node model ──
//
// The cached form of one namespace entry. Parent/child links are paths
// into the owning `NodeTree`, never references.

use serde::Serialize;
use zkbrowse_api::{NodeRecord, Stat};

use crate::path;

/// One node of the local mirror.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub path: String,
    pub name: String,
    pub data: Option<String>,
    /// Child paths. `None` = never fetched, `Some(vec![])` = fetched, empty.
    pub children: Option<Vec<String>>,
    pub is_leaf: bool,
    pub expanded: bool,
    pub selected: bool,
    pub version: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub status: Option<String>,
    pub stat: Option<Stat>,
    pub acls: Option<Vec<serde_json::Value>>,
}

impl Node {
    /// Build a mirror node from a gateway record, without descendants.
    ///
    /// `children` holds the record's direct child paths; the caller is
    /// responsible for inserting those children into the tree.
    pub fn from_record(record: &NodeRecord) -> Self {
        let children = record
            .children
            .as_ref()
            .map(|kids| kids.iter().map(|kid| kid.path.clone()).collect::<Vec<_>>());
        let is_leaf = children.as_ref().is_none_or(Vec::is_empty);
        let name = record
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| path::node_name(&record.path).to_owned());

        Self {
            path: record.path.clone(),
            name,
            data: record.data.clone(),
            children,
            is_leaf,
            expanded: false,
            selected: false,
            version: record.version.clone(),
            create_time: record.create_time.clone(),
            update_time: record.update_time.clone(),
            status: record.status.clone(),
            stat: record.stat,
            acls: record.acls.clone(),
        }
    }

    /// Number of direct children known to the mirror.
    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }

    /// The optimistic-concurrency token as a number, when it parses.
    pub fn version_number(&self) -> Option<i32> {
        self.version
            .as_deref()
            .and_then(|v| v.parse().ok())
            .or_else(|| self.stat.map(|s| s.version))
    }

    /// Whether the node is bound to a client session.
    pub fn is_ephemeral(&self) -> bool {
        self.stat.is_some_and(|s| s.ephemeral_owner != 0)
    }

    /// Copy every field the gateway reports except the child list.
    pub(crate) fn overlay(&mut self, record: &NodeRecord) {
        self.data.clone_from(&record.data);
        self.refresh_metadata(record);
    }

    /// Copy the metadata fields only, leaving data and children alone.
    pub(crate) fn refresh_metadata(&mut self, record: &NodeRecord) {
        if let Some(name) = record.name.as_ref().filter(|n| !n.is_empty()) {
            self.name.clone_from(name);
        }
        self.version.clone_from(&record.version);
        self.create_time.clone_from(&record.create_time);
        self.update_time.clone_from(&record.update_time);
        self.status.clone_from(&record.status);
        self.stat = record.stat;
        self.acls.clone_from(&record.acls);
    }
}
