//! Bulk transfer: export a subtree to JSON, import a JSON map.

use std::collections::BTreeMap;

use tabled::Tabled;

use zkbrowse_core::Explorer;

use crate::cli::{ExportArgs, GlobalOpts, ImportArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct EntryRow<'a> {
    #[tabled(rename = "Path")]
    path: &'a str,
    #[tabled(rename = "Data")]
    data: &'a str,
}

pub async fn export(
    explorer: &Explorer,
    args: &ExportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entries = explorer.export_subtree(&args.path).await?;

    if let Some(ref file) = args.file {
        std::fs::write(file, serde_json::to_string_pretty(&entries)?)?;
        output::print_status(
            &format!("Exported {} node(s) to {}", entries.len(), file.display()),
            global.quiet,
        );
        return Ok(());
    }

    let out = output::render_single(
        &global.output,
        &entries,
        |map: &BTreeMap<String, String>| {
            let rows: Vec<EntryRow<'_>> = map
                .iter()
                .map(|(path, data)| EntryRow { path, data })
                .collect();
            output::render_table(&rows)
        },
        |map| map.keys().cloned().collect::<Vec<_>>().join("\n"),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn import(
    explorer: &Explorer,
    args: &ImportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entries = util::read_json_map(&args.file)?;
    let count = explorer.import_data(&entries).await?;
    output::print_status(&format!("Imported {count} node(s)"), global.quiet);
    Ok(())
}
