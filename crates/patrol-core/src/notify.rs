// ── Front-end collaborators ──
//
// The core never draws anything. It reports outcomes through a `Notifier`
// and hands card clicks to an `ImageViewer`; the CLI and TUI implement both.

use strum::Display;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Receives user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NotificationKind);
}

impl<F> Notifier for F
where
    F: Fn(&str, NotificationKind) + Send + Sync,
{
    fn notify(&self, message: &str, kind: NotificationKind) {
        self(message, kind);
    }
}

/// Opens the detail view for one detection image.
pub trait ImageViewer {
    fn open(&self, path: &str, time: &str);
}

impl<F> ImageViewer for F
where
    F: Fn(&str, &str),
{
    fn open(&self, path: &str, time: &str) {
        self(path, time);
    }
}
