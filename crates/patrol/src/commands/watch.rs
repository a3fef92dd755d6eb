//! Watch command: run both poll loops and print changes until Ctrl-C.

use chrono::{DateTime, Utc};
use serde::Serialize;

use patrol_core::{Controller, DetectionResult, PatrolStatus, ResultSet, StatusSnapshot};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

/// One printed line. Structured formats emit one compact object per event.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum WatchEvent<'a> {
    Status {
        at: DateTime<Utc>,
        status: PatrolStatus,
        detection_interval: Option<f64>,
    },
    Results {
        at: DateTime<Utc>,
        total: usize,
        newest: Option<&'a DetectionResult>,
    },
}

pub async fn handle(
    controller: &Controller,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut status_rx = controller.status();
    let mut results_rx = controller.results();
    let color = output::should_color(global.color);

    controller.start();

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    let mut last_status: Option<(PatrolStatus, Option<f64>)> = None;
    let mut last_count: Option<usize> = None;

    loop {
        tokio::select! {
            res = &mut interrupted => {
                res?;
                break;
            }
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(snapshot) = status_rx.borrow_and_update().clone() else {
                    continue;
                };
                let key = (snapshot.status, snapshot.detection_interval);
                if last_status != Some(key) {
                    last_status = Some(key);
                    emit(&status_event(&snapshot), global, color)?;
                }
            }
            changed = results_rx.changed(), if !args.status_only => {
                if changed.is_err() {
                    break;
                }
                let results = results_rx.borrow_and_update().clone();
                if last_count != Some(results.len()) {
                    last_count = Some(results.len());
                    emit(&results_event(&results), global, color)?;
                }
            }
        }
    }

    controller.shutdown();
    tracing::info!("watch stopped");
    Ok(())
}

fn status_event(snapshot: &StatusSnapshot) -> WatchEvent<'static> {
    WatchEvent::Status {
        at: snapshot.fetched_at,
        status: snapshot.status,
        detection_interval: snapshot.detection_interval,
    }
}

fn results_event(results: &ResultSet) -> WatchEvent<'_> {
    WatchEvent::Results {
        at: Utc::now(),
        total: results.len(),
        newest: results.get(0),
    }
}

fn emit(event: &WatchEvent<'_>, global: &GlobalOpts, color: bool) -> Result<(), CliError> {
    let line = match global.output {
        OutputFormat::Table | OutputFormat::Plain => human_line(event, color),
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            serde_json::to_string(event)?
        }
    };
    output::print_output(&line, global.quiet);
    Ok(())
}

fn human_line(event: &WatchEvent<'_>, color: bool) -> String {
    match event {
        WatchEvent::Status {
            at,
            status,
            detection_interval,
        } => {
            let interval = detection_interval.map_or_else(|| "-".to_owned(), |s| format!("{s}s"));
            format!(
                "{}  status    {}  interval {interval}",
                at.format("%H:%M:%S"),
                output::status_label(*status, color),
            )
        }
        WatchEvent::Results { at, total, newest } => {
            let newest = newest.map_or_else(String::new, |r| format!("  newest {}", r.time));
            format!("{}  results   {total}{newest}", at.format("%H:%M:%S"))
        }
    }
}
