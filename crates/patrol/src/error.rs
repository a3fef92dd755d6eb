//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use patrol_config::ConfigError;
use patrol_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to patrol service at {url}")]
    #[diagnostic(
        code(patrol::connection_failed),
        help(
            "Check that the patrol service is running and reachable.\n\
             URL: {url}\n\
             Try: patrol --server http://HOST:3333 status"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Network error: {message}")]
    #[diagnostic(code(patrol::network))]
    Network { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(patrol::timeout),
        help("Increase timeout with --timeout or check service responsiveness.")
    )]
    Timeout,

    // ── Service ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(patrol::server_error), help("The service answered with HTTP {status}."))]
    Server { status: u16, message: String },

    #[error("{message}")]
    #[diagnostic(
        code(patrol::rejected),
        help("The service refused the change. Check its logs for details.")
    )]
    Rejected { message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(
        code(patrol::unexpected_response),
        help("Is --server pointing at a patrol service?")
    )]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(patrol::invalid_input))]
    InvalidInput { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(patrol::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(patrol::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: patrol config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(patrol::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(patrol::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(patrol::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(patrol::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Network { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::InvalidInput { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => CliError::InvalidInput { message },
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Network { message } => CliError::Network { message },
            CoreError::Server { status, message } => CliError::Server { status, message },
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::UnexpectedResponse { message } => CliError::UnexpectedResponse { message },
            CoreError::Config { message } => CliError::Validation {
                field: "server".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
