// ── API-to-domain conversions ──

use chrono::Utc;

use patrol_api::{ResultEntry, StatusResponse};

use crate::model::{DetectionResult, PatrolStatus, ResultSet, StatusSnapshot};

impl From<StatusResponse> for StatusSnapshot {
    fn from(resp: StatusResponse) -> Self {
        let status = if resp.is_active() {
            PatrolStatus::Active
        } else {
            PatrolStatus::Idle
        };
        Self {
            status,
            detection_interval: resp.det_step,
            fetched_at: Utc::now(),
        }
    }
}

impl From<ResultEntry> for DetectionResult {
    fn from(entry: ResultEntry) -> Self {
        Self {
            path: entry.path,
            time: entry.time,
        }
    }
}

impl From<Vec<ResultEntry>> for ResultSet {
    /// Server order is oldest-first; the set is newest-first.
    fn from(entries: Vec<ResultEntry>) -> Self {
        ResultSet::from_server_order(entries.into_iter().map(DetectionResult::from).collect())
    }
}
