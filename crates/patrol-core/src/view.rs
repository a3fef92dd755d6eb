// ── Status view model ──

use serde::Serialize;

use crate::model::{PatrolStatus, StatusSnapshot};

/// What the status header shows. Start and stop are never visible together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub status: PatrolStatus,
    /// `ACTIVE` or `IDLE`.
    pub label: &'static str,
    pub show_start: bool,
    pub show_end: bool,
    /// Current detection interval, rendered as the input placeholder.
    pub interval_placeholder: Option<String>,
}

impl StatusView {
    /// Before the first successful poll the panel reads as idle.
    pub fn from_snapshot(snapshot: Option<&StatusSnapshot>) -> Self {
        let status = snapshot.map_or(PatrolStatus::Idle, |s| s.status);
        let active = status == PatrolStatus::Active;
        Self {
            status,
            label: status.label(),
            show_start: !active,
            show_end: active,
            interval_placeholder: snapshot
                .and_then(|s| s.detection_interval)
                .map(|secs| secs.to_string()),
        }
    }
}
