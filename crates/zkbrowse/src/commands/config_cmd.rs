//! Config subcommand handlers.

use dialoguer::Input;
use tabled::Tabled;

use zkbrowse_config::{Config, Profile, config_path, load_config, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{active_profile_name, available_profiles};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    active: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
}

#[derive(serde::Serialize)]
struct ProfileEntry<'a> {
    name: &'a str,
    active: bool,
    #[serde(flatten)]
    profile: &'a Profile,
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// `None` for blank answers.
fn non_empty(answer: String) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = load_config()?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("# unrenderable: {e}")),
                |c| active_profile_name(global, c),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = load_config()?;
            let active = active_profile_name(global, &cfg);
            let entries: Vec<ProfileEntry<'_>> = cfg
                .profiles
                .iter()
                .map(|(name, profile)| ProfileEntry {
                    name,
                    active: *name == active,
                    profile,
                })
                .collect();

            let out = output::render_list(
                &global.output,
                &entries,
                |e| ProfileRow {
                    active: if e.active { "*" } else { "" },
                    name: e.name.to_owned(),
                    gateway: e.profile.gateway.clone(),
                    cluster: e.profile.cluster.clone().unwrap_or_default(),
                },
                |e| e.name.to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            output::print_status(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}

/// Interactive wizard: adds (or replaces) one profile and makes it the
/// default. Other profiles are kept.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_path();
    eprintln!("zkbrowse configuration");
    eprintln!("  Config path: {}\n", path.display());

    let mut cfg = load_config().unwrap_or_else(|_| Config::default());

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    let gateway: String = Input::new()
        .with_prompt("Gateway URL")
        .default(
            global
                .gateway
                .clone()
                .unwrap_or_else(|| "http://localhost:8080".into()),
        )
        .interact_text()
        .map_err(prompt_err)?;
    if url::Url::parse(&gateway).is_err() {
        return Err(CliError::Validation {
            field: "gateway".into(),
            reason: format!("invalid URL: {gateway}"),
        });
    }

    let cluster: String = Input::new()
        .with_prompt("Cluster address (host:port, blank to choose later)")
        .allow_empty(true)
        .default(global.cluster.clone().unwrap_or_default())
        .interact_text()
        .map_err(prompt_err)?;

    let profile = Profile {
        gateway,
        cluster: non_empty(cluster),
        insecure: global.insecure.then_some(true),
        timeout: global.timeout,
        ..Profile::default()
    };
    cfg.profiles.insert(name.clone(), profile);
    cfg.default_profile = Some(name.clone());
    save_config(&cfg)?;

    eprintln!("\nConfiguration written to {}", path.display());
    eprintln!("  Active profile: {name}");
    eprintln!("\n  Test it: zkbrowse clusters");
    Ok(())
}
