//! Patrol control handlers: start, stop, detection interval.

use tokio::sync::oneshot;

use patrol_core::{ActionOutcome, Controller};

use crate::cli::{GlobalOpts, IntervalArgs};
use crate::error::CliError;

use super::status;

pub async fn start(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let outcome = controller.start_inspection().await?;
    report(outcome, "Inspection started", global);
    Ok(())
}

pub async fn stop(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let outcome = controller.end_inspection().await?;
    report(outcome, "Inspection ended", global);
    Ok(())
}

/// Send a new detection interval, then show the refreshed status.
///
/// The confirmation line comes from the notifier; validation failures
/// surface as usage errors without touching the network.
pub async fn interval(
    controller: &Controller,
    args: &IntervalArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (tx, rx) = oneshot::channel();
    let outcome = controller
        .set_detection_interval(
            &args.value,
            Some(Box::new(move || {
                let _ = tx.send(());
            })),
        )
        .await?;

    if matches!(outcome, ActionOutcome::Busy) {
        return Ok(());
    }

    // A failed refresh still fires the completion; the stale snapshot is simply absent.
    let _ = rx.await;
    if let Some(snapshot) = controller.status_snapshot() {
        status::print(&snapshot, global)?;
    }
    Ok(())
}

fn report(outcome: ActionOutcome, fallback: &str, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    match outcome {
        ActionOutcome::Completed { message } => {
            let message = message.filter(|m| !m.trim().is_empty());
            eprintln!("✓ {}", message.as_deref().unwrap_or(fallback));
        }
        ActionOutcome::Busy => eprintln!("Request already in progress"),
    }
}
