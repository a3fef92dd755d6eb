// Wire models for the patrol control service.
//
// The service is loose about types (det_step arrives as a string, start/end
// bodies are free-form), so decoding here is tolerant.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

/// A response body, normalized by declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body declared `application/json` and parsed.
    Json(Value),
    /// Anything else, kept as text.
    Text(String),
}

impl Payload {
    /// Decode the payload into a typed model.
    ///
    /// Text bodies are given one chance to parse as JSON, since some
    /// deployments omit the content-type header.
    pub fn decode<T: for<'de> Deserialize<'de>>(self) -> Result<T, Error> {
        match self {
            Self::Json(value) => {
                serde_json::from_value::<T>(value.clone()).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: value.to_string(),
                })
            }
            Self::Text(body) => {
                serde_json::from_str::<T>(&body).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body,
                })
            }
        }
    }
}

/// `GET /get_status`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusResponse {
    /// `"Active"` while patrolling; anything else means idle.
    #[serde(default)]
    pub patrol_status: String,

    /// Configured detection interval in seconds.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub det_step: Option<f64>,
}

impl StatusResponse {
    pub fn is_active(&self) -> bool {
        self.patrol_status == "Active"
    }
}

/// `POST /set_det_step` request body. The service expects the value as a string.
#[derive(Debug, Clone, Serialize)]
pub struct StepRequest {
    pub step: String,
}

/// `POST /set_det_step` response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StepResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StepResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Acknowledgement for start/end. Any successful HTTP response counts;
/// the message is kept when the body happens to carry one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ack {
    pub message: Option<String>,
}

impl From<Payload> for Ack {
    fn from(payload: Payload) -> Self {
        let message = match payload {
            Payload::Json(value) => value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            Payload::Text(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
            Payload::Text(_) => None,
        };
        Self { message }
    }
}

/// One entry of `GET /get_result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// Image reference (URL or path).
    pub path: String,
    /// Timestamp label, already formatted by the service.
    pub time: String,
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Accept a number, a numeric string, or null. Unparsable strings become `None`.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    let seconds = match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    Ok(seconds.filter(|n| n.is_finite()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn det_step_accepts_string_and_number() {
        let from_string: StatusResponse =
            serde_json::from_value(json!({"patrol_status": "Active", "det_step": "4.0"})).unwrap();
        assert_eq!(from_string.det_step, Some(4.0));
        assert!(from_string.is_active());

        let from_number: StatusResponse =
            serde_json::from_value(json!({"patrol_status": "Inactive", "det_step": 0.5})).unwrap();
        assert_eq!(from_number.det_step, Some(0.5));
        assert!(!from_number.is_active());
    }

    #[test]
    fn det_step_missing_or_garbage_is_none() {
        let missing: StatusResponse =
            serde_json::from_value(json!({"patrol_status": "Inactive"})).unwrap();
        assert_eq!(missing.det_step, None);

        let garbage: StatusResponse =
            serde_json::from_value(json!({"patrol_status": "Inactive", "det_step": "soon"}))
                .unwrap();
        assert_eq!(garbage.det_step, None);
    }

    #[test]
    fn ack_reads_message_when_present() {
        let ack = Ack::from(Payload::Json(json!({"status": "success", "message": "Patrol started"})));
        assert_eq!(ack.message.as_deref(), Some("Patrol started"));
        assert_eq!(Ack::from(Payload::Text(String::new())), Ack::default());
    }

    #[test]
    fn text_payload_falls_back_to_json_parse() {
        let entries: Vec<ResultEntry> =
            Payload::Text(r#"[{"path":"a.jpg","time":"t1"}]"#.into()).decode().unwrap();
        assert_eq!(entries.len(), 1);

        let err = Payload::Text("<html>".into()).decode::<Vec<ResultEntry>>().unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
