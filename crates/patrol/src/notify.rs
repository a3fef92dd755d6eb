//! Terminal notifier for one-shot commands.

use patrol_core::{NotificationKind, Notifier};

/// Prints confirmations to stderr. Failures are left to the command's
/// diagnostic report, so they are only traced here.
#[derive(Debug, Clone, Copy)]
pub struct CliNotifier {
    quiet: bool,
}

impl CliNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for CliNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success if !self.quiet => eprintln!("✓ {message}"),
            NotificationKind::Success => {}
            NotificationKind::Error => tracing::debug!(%message, "error notification"),
        }
    }
}
