//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use patrol_core::{ControlAction, NotificationKind, ResultSet, StatusSnapshot};

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Every state transition in the TUI flows through one of these.
#[derive(Debug, Clone)]
pub enum Action {
    // ── App lifecycle ────────────────────────────────────────────────
    Quit,
    ToggleHelp,

    // ── Data from the controller ─────────────────────────────────────
    StatusUpdated(StatusSnapshot),
    ResultsUpdated(Arc<ResultSet>),
    Notify(Notification),

    // ── Control actions (executed by the app against the controller) ──
    StartPatrol,
    EndPatrol,
    SubmitInterval(String),
    /// The status refresh after a successful interval change finished.
    IntervalApplied,
    /// A start/end/interval request returned, whatever the outcome.
    ControlSettled(ControlAction),

    // ── Detail viewer ────────────────────────────────────────────────
    OpenViewer { path: String, time: String },
    CloseViewer,
}

impl Action {
    pub fn notify(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self::Notify(Notification {
            message: message.into(),
            kind,
        })
    }
}
