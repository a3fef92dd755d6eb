// ── Core error types ──
//
// User-facing errors from patrol-core. The `From<patrol_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// Rejected locally, before any network call. The message is shown as-is.
    #[error("{message}")]
    Validation { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to patrol service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to patrol service timed out")]
    Timeout,

    #[error("Network error: {message}")]
    Network { message: String },

    // ── Server errors ────────────────────────────────────────────────
    /// Non-success HTTP status with the extracted message.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The service answered but refused the change (`status != "success"`).
    #[error("Rejected by patrol service: {message}")]
    Rejected { message: String },

    #[error("Unexpected response from patrol service: {message}")]
    UnexpectedResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures that never reached a server response.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout | Self::Network { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<patrol_api::Error> for CoreError {
    fn from(err: patrol_api::Error) -> Self {
        match err {
            patrol_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Network {
                        message: e.to_string(),
                    }
                }
            }
            patrol_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            patrol_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            patrol_api::Error::Server { status, message } => CoreError::Server { status, message },
            patrol_api::Error::Deserialization { message, body: _ } => {
                CoreError::UnexpectedResponse { message }
            }
        }
    }
}
