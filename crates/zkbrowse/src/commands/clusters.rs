//! Cluster listing and registry management.

use tabled::Tabled;

use zkbrowse_core::{ClusterInfo, Explorer};

use crate::cli::{
    ClusterAddArgs, ClusterFields, ClusterUpdateArgs, ClustersArgs, ClustersCommand, GlobalOpts,
};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ClusterInfo> for ClusterRow {
    fn from(c: &ClusterInfo) -> Self {
        Self {
            id: c.id.map_or_else(|| "-".into(), |id| id.to_string()),
            name: c.display_name(),
            address: c.address(),
            description: c.description.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    explorer: &Explorer,
    args: ClustersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command.unwrap_or(ClustersCommand::List) {
        ClustersCommand::List => list(explorer, global).await,
        ClustersCommand::Add(args) => add(explorer, args, global).await,
        ClustersCommand::Update(args) => update(explorer, args, global).await,
        ClustersCommand::Rm { id } => remove(explorer, id, global).await,
    }
}

async fn list(explorer: &Explorer, global: &GlobalOpts) -> Result<(), CliError> {
    let clusters = explorer.fetch_clusters().await;

    // The listing never fails outright; the reason lands in the error slot.
    if let Some(reason) = explorer.error() {
        return Err(CliError::ConnectionFailed {
            target: explorer.config().gateway_url.to_string(),
            reason,
        });
    }

    let out = output::render_list(
        &global.output,
        clusters.as_slice(),
        |c| ClusterRow::from(c),
        ClusterInfo::address,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn add(
    explorer: &Explorer,
    args: ClusterAddArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut record = ClusterInfo::new(args.host);
    apply_fields(args.fields, &mut record);

    let stored = explorer.add_cluster(&record).await?;
    output::print_status(
        &format!("Registered {} ({})", stored.display_name(), stored.address()),
        global.quiet,
    );
    print_record(&stored, global)
}

async fn update(
    explorer: &Explorer,
    args: ClusterUpdateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut record = explorer.cluster_record(args.id).await?;
    if let Some(host) = args.host {
        record.host = host;
    }
    apply_fields(args.fields, &mut record);

    let stored = explorer.update_cluster(args.id, &record).await?;
    output::print_status(&format!("Updated cluster {}", args.id), global.quiet);
    print_record(&stored, global)
}

async fn remove(explorer: &Explorer, id: i64, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm(
        "clusters rm",
        &format!("Remove cluster {id} from the registry?"),
        global.yes,
    )? {
        output::print_status("Aborted", global.quiet);
        return Ok(());
    }

    explorer.remove_cluster(id).await?;
    output::print_status(&format!("Removed cluster {id}"), global.quiet);
    Ok(())
}

/// Overwrite the fields that were given on the command line.
fn apply_fields(fields: ClusterFields, record: &mut ClusterInfo) {
    if fields.name.is_some() {
        record.name = fields.name;
    }
    if fields.port.is_some() {
        record.port = fields.port;
    }
    if fields.retry_count.is_some() {
        record.retry_count = fields.retry_count;
    }
    if fields.session_timeout.is_some() {
        record.timeout = fields.session_timeout;
    }
    if fields.description.is_some() {
        record.description = fields.description;
    }
}

fn print_record(record: &ClusterInfo, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, record, detail, |c| {
        c.id.map(|id| id.to_string()).unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(c: &ClusterInfo) -> String {
    let optional = |value: Option<String>| value.unwrap_or_else(|| "-".into());
    output::render_detail(&[
        ("ID", optional(c.id.map(|id| id.to_string()))),
        ("Name", c.display_name()),
        ("Address", c.address()),
        ("Retries", optional(c.retry_count.map(|n| n.to_string()))),
        ("Timeout", optional(c.timeout.map(|ms| format!("{ms} ms")))),
        ("Description", optional(c.description.clone())),
    ])
}
