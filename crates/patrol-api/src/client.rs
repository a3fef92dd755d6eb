// Patrol service HTTP client
//
// Wraps `reqwest::Client` with URL construction and response
// normalization. Endpoints (status, control, results) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::Payload;
use crate::transport::TransportConfig;

/// Longest error message extracted from a non-JSON error body.
const MAX_TEXT_MESSAGE: usize = 200;

/// Raw HTTP client for the patrol control service.
///
/// Every request goes through [`PatrolClient::request`], which normalizes
/// the body (JSON when declared, text otherwise) and turns non-success
/// statuses into [`Error::Server`] with a readable message.
#[derive(Debug, Clone)]
pub struct PatrolClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PatrolClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the service root, e.g. `http://192.168.1.20:3333`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}`, tolerating a trailing slash on the base.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and normalize the response.
    pub(crate) async fn get(&self, path: &str) -> Result<Payload, Error> {
        self.request(Method::GET, path, None::<&Value>).await
    }

    /// Send a POST request, with an optional JSON body, and normalize the response.
    pub(crate) async fn post(
        &self,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<Payload, Error> {
        self.request(Method::POST, path, body).await
    }

    /// Perform a request against `path` and normalize the response.
    ///
    /// Bodies declared `application/json` are parsed; everything else is
    /// returned as text. Non-success statuses fail with [`Error::Server`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<Payload, Error> {
        let url = self.endpoint_url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = resp.text().await.map_err(Error::Transport)?;
        trace!(status = status.as_u16(), len = text.len(), "response received");

        let payload = if is_json {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => Payload::Json(value),
                Err(e) if status.is_success() => {
                    return Err(Error::Deserialization {
                        message: e.to_string(),
                        body: text,
                    });
                }
                // A broken error body still gets a readable message.
                Err(_) => Payload::Text(text),
            }
        } else {
            Payload::Text(text)
        };

        if status.is_success() {
            Ok(payload)
        } else {
            Err(Error::Server {
                status: status.as_u16(),
                message: failure_message(status, &payload),
            })
        }
    }
}

// ── Message extraction ──────────────────────────────────────────────

/// Human-readable message for a failed response.
///
/// Prefers a JSON `message` field, then the markup-stripped text body
/// (first 200 characters), then `Request failed: {code} {reason}`.
pub fn failure_message(status: StatusCode, payload: &Payload) -> String {
    let extracted = match payload {
        Payload::Json(value) => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned),
        Payload::Text(text) => {
            let stripped = strip_markup(text);
            let trimmed = stripped.trim();
            (!trimmed.is_empty()).then(|| trimmed.chars().take(MAX_TEXT_MESSAGE).collect())
        }
    };

    extracted.unwrap_or_else(|| {
        let reason = status.canonical_reason().unwrap_or_default();
        format!("Request failed: {} {reason}", status.as_u16())
            .trim_end()
            .to_owned()
    })
}

/// Remove `<...>` tags. An unterminated `<` is kept as text.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                rest = &rest[open..];
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
