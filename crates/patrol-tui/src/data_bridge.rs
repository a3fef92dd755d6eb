//! Data bridge — connects [`Controller`] state to TUI actions.
//!
//! Starts the controller's poll loops, then forwards every status and
//! result-set change as an [`Action`] until cancelled. Also provides the
//! channel-backed [`Notifier`] the controller reports through.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use patrol_core::{Controller, NotificationKind, Notifier};

use crate::action::Action;

/// Forwards controller notifications into the action loop as toasts.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Action>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        let _ = self.tx.send(Action::notify(message, kind));
    }
}

/// Run the bridge until `cancel` fires, then stop polling.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut status = controller.status();
    let mut results = controller.results();

    controller.start();

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = status.changed() => {
                let snapshot = status.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    let _ = action_tx.send(Action::StatusUpdated(snapshot));
                }
            }
            Ok(()) = results.changed() => {
                let set = results.borrow_and_update().clone();
                let _ = action_tx.send(Action::ResultsUpdated(set));
            }
            else => break,
        }
    }

    controller.shutdown();
    debug!("data bridge shut down");
}
