//! CLI configuration — thin wrapper around `patrol_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --timeout, etc.).

use patrol_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use patrol_config::{
    Config, ConfigError, Defaults, Profile, config_path, load_config_or_default, save_config,
};

/// Everything a controller-bound command needs from configuration.
#[derive(Debug)]
pub struct Resolved {
    pub controller: ControllerConfig,
    pub page_size: usize,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build the controller configuration: flag > env > profile > defaults.
///
/// A profile that does not exist is only an error when it was asked for
/// explicitly and no `--server` is given; otherwise the built-in default
/// server is used.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() && global.server.is_none() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let controller =
        patrol_config::profile_to_controller_config(&profile, &cfg.defaults).map_err(into_cli)?;
    tracing::debug!(profile = %profile_name, url = %controller.url, "resolved configuration");

    Ok(Resolved {
        controller,
        page_size: cfg.page_size(&profile),
    })
}

/// Validation problems are usage errors; everything else is a config failure.
pub fn into_cli(err: ConfigError) -> CliError {
    match err {
        ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
        other => CliError::Config(other),
    }
}
