//! Profile resolution: config file + global flags -> `ExplorerConfig`.
//!
//! The TOML structures live in `zkbrowse-config`; this module only layers
//! command-line overrides on top and picks the cluster to connect to.

use zkbrowse_config::{Config, Profile, profile_to_explorer_config};
use zkbrowse_core::ExplorerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a node command needs to start a session.
#[derive(Debug)]
pub struct Resolved {
    pub explorer: ExplorerConfig,
    /// Cluster address from `--cluster` or the profile.
    pub cluster: Option<String>,
}

/// Resolve the active profile name: `--profile` > `default_profile` > "default".
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Load the config file and resolve it against the global flags.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = zkbrowse_config::load_config()?;
    resolve_with(&cfg, global)
}

/// Resolve an already-loaded config against the global flags.
///
/// Flags beat the profile. Without any profile, `--gateway` alone is enough.
pub fn resolve_with(cfg: &Config, global: &GlobalOpts) -> Result<Resolved, CliError> {
    let name = active_profile_name(global, cfg);

    let profile = match cfg.profiles.get(&name) {
        Some(profile) => with_overrides(profile.clone(), global),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            });
        }
        None => {
            let gateway = global.gateway.clone().ok_or_else(|| CliError::NoConfig {
                path: zkbrowse_config::config_path().display().to_string(),
            })?;
            with_overrides(
                Profile {
                    gateway,
                    ..Profile::default()
                },
                global,
            )
        }
    };

    let explorer = profile_to_explorer_config(&profile, &cfg.defaults)?;
    let cluster = global.cluster.clone().or(profile.cluster);
    Ok(Resolved { explorer, cluster })
}

fn with_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref gateway) = global.gateway {
        profile.gateway.clone_from(gateway);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile
}

/// Comma-separated profile names, or "(none)".
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use zkbrowse_core::TlsVerification;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["zkbrowse"];
        argv.extend_from_slice(args);
        argv.push("clusters");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut cfg = Config::default();
        cfg.default_profile = Some(name.into());
        cfg.profiles.insert(name.into(), profile);
        cfg
    }

    #[test]
    fn profile_supplies_gateway_and_cluster() {
        let cfg = config_with(
            "lab",
            Profile {
                gateway: "http://gw:8080".into(),
                cluster: Some("zk1:2181".into()),
                ..Profile::default()
            },
        );
        let resolved = resolve_with(&cfg, &global(&[])).unwrap();
        assert_eq!(resolved.explorer.gateway_url.as_str(), "http://gw:8080/");
        assert_eq!(resolved.cluster.as_deref(), Some("zk1:2181"));
        assert_eq!(resolved.explorer.protected_prefix.as_deref(), Some("/zookeeper"));
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with(
            "lab",
            Profile {
                gateway: "http://gw:8080".into(),
                cluster: Some("zk1:2181".into()),
                ..Profile::default()
            },
        );
        let resolved = resolve_with(
            &cfg,
            &global(&["--gateway", "http://other:9000", "--cluster", "zk2:2181", "-k", "--timeout", "5"]),
        )
        .unwrap();
        assert_eq!(resolved.explorer.gateway_url.as_str(), "http://other:9000/");
        assert_eq!(resolved.cluster.as_deref(), Some("zk2:2181"));
        assert_eq!(resolved.explorer.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(resolved.explorer.timeout, Duration::from_secs(5));
    }

    #[test]
    fn gateway_flag_alone_is_enough() {
        let resolved = resolve_with(&Config::default(), &global(&["-g", "http://gw:8080"])).unwrap();
        assert!(resolved.cluster.is_none());
        assert_eq!(resolved.explorer.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_everything_is_no_config() {
        let err = resolve_with(&Config::default(), &global(&[])).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }), "got: {err:?}");
    }

    #[test]
    fn unknown_explicit_profile_is_reported() {
        let cfg = config_with("lab", Profile::default());
        let err = resolve_with(&cfg, &global(&["--profile", "prod"])).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "lab");
            }
            other => panic!("expected ProfileNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn bad_gateway_url_is_validation_error() {
        let err = resolve_with(&Config::default(), &global(&["-g", "not a url"])).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }), "got: {err:?}");
    }
}
