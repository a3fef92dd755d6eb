// ── Domain model ──
//
// Status and detection results as consumers see them. Both are replaced
// wholesale on every poll; nothing here is diffed or merged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

/// Whether a patrol is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum PatrolStatus {
    Active,
    #[default]
    Idle,
}

impl PatrolStatus {
    /// Uppercase label used by the status indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Idle => "IDLE",
        }
    }
}

/// Result of one successful status poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub status: PatrolStatus,
    /// Seconds between detections, when the service reported a usable value.
    pub detection_interval: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

impl StatusSnapshot {
    pub fn is_active(&self) -> bool {
        self.status == PatrolStatus::Active
    }
}

/// One detection image. Identity is its position in the current `ResultSet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    /// Image reference (URL or path).
    pub path: String,
    /// Timestamp label as sent by the service.
    pub time: String,
}

/// Newest-first list of detection results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    items: Vec<DetectionResult>,
}

impl ResultSet {
    /// Build from server order (oldest first), reversing so index 0 is newest.
    pub fn from_server_order(mut items: Vec<DetectionResult>) -> Self {
        items.reverse();
        Self { items }
    }

    /// Build from a list that is already newest-first.
    pub fn from_newest_first(items: Vec<DetectionResult>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DetectionResult> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[DetectionResult] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionResult> {
        self.items.iter()
    }

    /// Convenience for callers that publish through a watch channel.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a DetectionResult;
    type IntoIter = std::slice::Iter<'a, DetectionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
