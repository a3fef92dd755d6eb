// ── Runtime connection configuration ──
//
// Describes *how* to reach the patrol service and how often to poll it.
// Never touches disk; the CLI/TUI constructs a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Status and results are both polled once per second.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed appliances).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single patrol service.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Service root (e.g., `http://192.168.1.20:3333`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between the end of one status poll and the start of the next.
    pub status_interval: Duration,
    /// Delay between the end of one results poll and the start of the next.
    pub results_interval: Duration,
}

impl ControllerConfig {
    /// Config for `url` with default timeout and 1 s poll cadence.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            status_interval: DEFAULT_POLL_INTERVAL,
            results_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
