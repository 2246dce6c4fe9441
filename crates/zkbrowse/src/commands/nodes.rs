//! Node commands: tree, get, create, set, rm.

use chrono::DateTime;

use zkbrowse_core::path::{self, ROOT};
use zkbrowse_core::{
    CreateMode, CreateNodeRequest, Explorer, Node, NodeOperation, NodeOperationResult,
    UpdateNodeRequest,
};

use crate::cli::{CreateArgs, GetArgs, GlobalOpts, ModeArg, RmArgs, SetArgs, TreeArgs};
use crate::error::CliError;
use crate::output;

use super::util;

const PREVIEW_LEN: usize = 48;

// ── Read ─────────────────────────────────────────────────────────────

pub fn tree(explorer: &Explorer, args: &TreeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let start = lookup_path(&args.path)?;
    let snapshot = explorer.tree();
    if !snapshot.contains(&start) {
        return Err(not_in_namespace(&start));
    }

    let max_depth = args.depth.unwrap_or(usize::MAX);
    let entries: Vec<(usize, &Node)> = snapshot
        .subtree(&start)
        .filter(|(depth, _)| *depth <= max_depth)
        .collect();
    let nodes: Vec<&Node> = entries.iter().map(|(_, node)| *node).collect();

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &nodes,
        |_| outline(&entries, color),
        |nodes| {
            nodes
                .iter()
                .map(|n| n.path.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn get(explorer: &Explorer, args: &GetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = lookup_path(&args.path)?;
    let node = explorer
        .node(&target)
        .ok_or_else(|| not_in_namespace(&target))?;

    let out = output::render_single(&global.output, &node, detail, |n| {
        n.data.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Write ────────────────────────────────────────────────────────────

pub async fn create(
    explorer: &Explorer,
    args: CreateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let request = CreateNodeRequest::new(args.path, args.data).with_mode(create_mode(args.mode));
    let result = explorer
        .perform_node_operation(NodeOperation::Create(request))
        .await?;

    if let NodeOperationResult::Created {
        path,
        created_parents,
        overwritten,
    } = result
    {
        let message = if overwritten {
            format!("Node {path} already existed, data overwritten")
        } else if created_parents.is_empty() {
            format!("Created {path}")
        } else {
            format!("Created {path} (with {})", created_parents.join(", "))
        };
        output::print_status(&message, global.quiet);
    }
    Ok(())
}

pub async fn set(explorer: &Explorer, args: SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let result = explorer
        .perform_node_operation(NodeOperation::Update(UpdateNodeRequest::new(
            args.path, args.data,
        )))
        .await?;

    if let NodeOperationResult::Updated { path } = result {
        output::print_status(&format!("Updated {path}"), global.quiet);
    }
    Ok(())
}

pub async fn rm(explorer: &Explorer, args: RmArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = path::normalize(&args.path)?;
    let below = explorer.tree().subtree(&target).count().saturating_sub(1);
    let prompt = if below == 0 {
        format!("Delete {target}?")
    } else {
        format!("Delete {target} and {below} node(s) below it?")
    };
    if !util::confirm("rm", &prompt, global.yes)? {
        output::print_status("Aborted", global.quiet);
        return Ok(());
    }

    let result = explorer
        .perform_node_operation(NodeOperation::Delete {
            path: target,
            version: args.version,
        })
        .await?;

    if let NodeOperationResult::Deleted { path, removed } = result {
        output::print_status(
            &format!("Deleted {path} ({} node(s) removed)", removed.len()),
            global.quiet,
        );
    }
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Normalize a user-supplied path; the root is allowed for reads.
fn lookup_path(raw: &str) -> Result<String, CliError> {
    if raw.starts_with('/') && raw.trim_matches('/').is_empty() {
        return Ok(ROOT.to_owned());
    }
    Ok(path::normalize(raw)?)
}

fn not_in_namespace(path: &str) -> CliError {
    CliError::NotFound {
        message: format!("{path} is not in the namespace"),
    }
}

fn create_mode(mode: ModeArg) -> CreateMode {
    match mode {
        ModeArg::Persistent => CreateMode::Persistent,
        ModeArg::PersistentSequential => CreateMode::PersistentSequential,
        ModeArg::Ephemeral => CreateMode::Ephemeral,
        ModeArg::EphemeralSequential => CreateMode::EphemeralSequential,
    }
}

/// Indented outline, one node per line with a data preview.
fn outline(entries: &[(usize, &Node)], color: bool) -> String {
    entries
        .iter()
        .map(|(depth, node)| {
            let mut line = format!(
                "{}{}",
                "  ".repeat(*depth),
                output::paint_name(&node.name, node.is_leaf, color)
            );
            if let Some(data) = node.data.as_deref().filter(|d| !d.is_empty()) {
                line.push_str("  ");
                line.push_str(&output::paint_dim(&format!("= {}", preview(data)), color));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview(data: &str) -> String {
    let first_line = data.lines().next().unwrap_or_default();
    if first_line.chars().count() > PREVIEW_LEN || first_line.len() < data.len() {
        let cut: String = first_line.chars().take(PREVIEW_LEN).collect();
        format!("{cut}...")
    } else {
        first_line.to_owned()
    }
}

fn detail(node: &Node) -> String {
    let stat = node.stat.unwrap_or_default();
    let mut fields = vec![
        ("Path", node.path.clone()),
        ("Data", node.data.clone().unwrap_or_default()),
        (
            "Version",
            node.version_number()
                .map_or_else(|| "-".into(), |v| v.to_string()),
        ),
        ("Children", node.child_count().to_string()),
        ("Data Length", stat.data_length.to_string()),
        (
            "Created",
            node.create_time
                .clone()
                .unwrap_or_else(|| format_millis(stat.ctime)),
        ),
        (
            "Modified",
            node.update_time
                .clone()
                .unwrap_or_else(|| format_millis(stat.mtime)),
        ),
    ];
    if node.is_ephemeral() {
        fields.push(("Ephemeral Owner", format!("0x{:x}", stat.ephemeral_owner)));
    }
    if let Some(status) = &node.status {
        fields.push(("Status", status.clone()));
    }
    output::render_detail(&fields)
}

fn format_millis(ms: i64) -> String {
    if ms <= 0 {
        return "-".into();
    }
    DateTime::from_timestamp_millis(ms).map_or_else(
        || ms.to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zkbrowse_core::Stat;

    use super::*;

    #[test]
    fn lookup_allows_root_and_normalizes() {
        assert_eq!(lookup_path("/").unwrap(), "/");
        assert_eq!(lookup_path("//").unwrap(), "/");
        assert_eq!(lookup_path("/app//db/").unwrap(), "/app/db");
        assert!(lookup_path("app").is_err());
    }

    #[test]
    fn preview_truncates_long_and_multiline_data() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("line one\nline two"), "line one...");
        let long = "x".repeat(PREVIEW_LEN + 5);
        assert_eq!(preview(&long), format!("{}...", "x".repeat(PREVIEW_LEN)));
    }

    #[test]
    fn millis_render_as_utc() {
        assert_eq!(format_millis(0), "-");
        assert_eq!(format_millis(86_400_000), "1970-01-02 00:00:00 UTC");
    }

    #[test]
    fn detail_shows_ephemeral_owner() {
        let node = Node {
            path: "/lock".into(),
            name: "lock".into(),
            data: Some("me".into()),
            children: None,
            is_leaf: true,
            expanded: false,
            selected: false,
            version: Some("2".into()),
            create_time: None,
            update_time: None,
            status: None,
            stat: Some(Stat {
                ephemeral_owner: 255,
                ..Stat::default()
            }),
            acls: None,
        };
        let text = detail(&node);
        assert!(text.contains("Ephemeral Owner  0xff"), "{text}");
        assert!(text.contains("Version"));
        assert!(text.contains('2'));
    }

    #[test]
    fn outline_indents_by_depth() {
        let root = Node {
            path: "/".into(),
            name: "/".into(),
            data: None,
            children: Some(vec!["/a".into()]),
            is_leaf: false,
            expanded: false,
            selected: false,
            version: None,
            create_time: None,
            update_time: None,
            status: None,
            stat: None,
            acls: None,
        };
        let child = Node {
            path: "/a".into(),
            name: "a".into(),
            data: Some("v".into()),
            children: None,
            is_leaf: true,
            ..root.clone()
        };
        let text = outline(&[(0, &root), (1, &child)], false);
        assert_eq!(text, "/\n  a  = v");
    }
}
