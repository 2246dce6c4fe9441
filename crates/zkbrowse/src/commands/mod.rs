//! Command handlers, one module per command group.

pub mod clusters;
pub mod config_cmd;
pub mod nodes;
pub mod transfer;
pub mod util;

use zkbrowse_core::Explorer;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Run a gateway-backed command.
///
/// Everything except `clusters` works against one cluster, so the session
/// is connected (and the root subtree mirrored) before the handler runs.
pub async fn dispatch(
    cmd: Command,
    explorer: &Explorer,
    cluster: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cmd = match cmd {
        Command::Clusters(args) => return clusters::handle(explorer, args, global).await,
        other => other,
    };

    let cluster = cluster.ok_or(CliError::NoCluster)?;
    explorer.connect(cluster).await?;

    match cmd {
        Command::Tree(args) => nodes::tree(explorer, &args, global),
        Command::Get(args) => nodes::get(explorer, &args, global),
        Command::Create(args) => nodes::create(explorer, args, global).await,
        Command::Set(args) => nodes::set(explorer, args, global).await,
        Command::Rm(args) => nodes::rm(explorer, args, global).await,
        Command::Export(args) => transfer::export(explorer, &args, global).await,
        Command::Import(args) => transfer::import(explorer, &args, global).await,
        Command::Clusters(_) | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
