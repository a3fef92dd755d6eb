//! Shared configuration for the patrol CLI and TUI.
//!
//! TOML profiles layered with `PATROL_` environment variables, and
//! translation to `patrol_core::ControllerConfig`. Both binaries depend on
//! this crate; the CLI adds flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use patrol_core::{ControllerConfig, TlsVerification};

/// Where the reference service listens when nothing else is configured.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3333";

/// Overrides the config file location (used by tests and packaging).
pub const CONFIG_PATH_ENV: &str = "PATROL_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Cards per gallery page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Delay between poll ticks, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_page_size() -> usize {
    20
}
fn default_poll_interval_ms() -> u64 {
    1000
}

/// A named patrol service profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "http://192.168.1.20:3333").
    pub server: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed certificates.
    pub insecure: Option<bool>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override poll cadence (milliseconds).
    pub poll_interval_ms: Option<u64>,

    /// Override cards per page.
    pub page_size: Option<usize>,
}

impl Profile {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            poll_interval_ms: None,
            page_size: None,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER)
    }
}

impl Config {
    /// Resolve the active profile name: explicit choice, then `default_profile`, then "default".
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// The named profile, or one pointing at [`DEFAULT_SERVER`] if it is missing.
    pub fn profile_or_default(&self, name: &str) -> Profile {
        self.profiles.get(name).cloned().unwrap_or_default()
    }

    /// Page size for a profile, falling back to the global default.
    pub fn page_size(&self, profile: &Profile) -> usize {
        profile.page_size.unwrap_or(self.defaults.page_size).max(1)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `PATROL_CONFIG`, else XDG / platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "patrol", "patrol").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("patrol");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, layered over defaults and under `PATROL_*` env.
///
/// Nested keys use a double underscore: `PATROL_DEFAULTS__PAGE_SIZE=50`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PATROL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse and check a service URL.
pub fn parse_server(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

/// Build a `ControllerConfig` from a profile and the global defaults.
pub fn profile_to_controller_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let url = parse_server(&profile.server)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let poll = Duration::from_millis(
        profile
            .poll_interval_ms
            .unwrap_or(defaults.poll_interval_ms)
            .max(1),
    );

    let mut config = ControllerConfig::new(url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.status_interval = poll;
    config.results_interval = poll;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.page_size, 20);
        assert_eq!(cfg.defaults.poll_interval_ms, 1000);
        assert_eq!(cfg.active_profile_name(None), "default");
        assert_eq!(cfg.profile_or_default("default").server, DEFAULT_SERVER);
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut lab = Profile::new("http://192.168.112.89:3333");
        lab.page_size = Some(50);
        cfg.profiles.insert("lab".into(), lab);
        cfg.default_profile = Some("lab".into());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.active_profile_name(None), "lab");
        let profile = loaded.profile_or_default("lab");
        assert_eq!(profile.server, "http://192.168.112.89:3333");
        assert_eq!(loaded.page_size(&profile), 50);
        assert_eq!(loaded.active_profile_name(Some("other")), "other");
    }

    #[test]
    fn profile_translates_to_controller_config() {
        let mut profile = Profile::new("http://10.0.0.7:3333");
        profile.timeout = Some(3);
        profile.poll_interval_ms = Some(500);

        let config = profile_to_controller_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(config.url.as_str(), "http://10.0.0.7:3333/");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.status_interval, Duration::from_millis(500));
        assert_eq!(config.results_interval, Duration::from_millis(500));
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let mut profile = Profile::new("https://patrol.local");
        profile.insecure = Some(true);
        profile.ca_cert = Some("/etc/ca.pem".into());

        let config = profile_to_controller_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rejects_bad_server_urls() {
        assert!(matches!(
            parse_server("not a url"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            parse_server("ftp://host"),
            Err(ConfigError::Validation { .. })
        ));
    }
}
