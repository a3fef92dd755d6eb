#![allow(clippy::unwrap_used)]
// Integration tests for `PatrolClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patrol_api::{Error, PatrolClient, ResultEntry};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PatrolClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = PatrolClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_status_active() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/get_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "patrol_status": "Active",
            "text": "Patrol in progress",
            "det_step": "4.0",
            "timestamp": "2024-05-01T10:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.get_status().await.unwrap();
    assert!(status.is_active());
    assert_eq!(status.det_step, Some(4.0));
}

#[tokio::test]
async fn test_get_status_inactive_is_not_active() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/get_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "patrol_status": "Inactive",
            "det_step": 1.5
        })))
        .mount(&server)
        .await;

    let status = client.get_status().await.unwrap();
    assert!(!status.is_active());
    assert_eq!(status.det_step, Some(1.5));
}

// ── Detection interval ──────────────────────────────────────────────

#[tokio::test]
async fn test_set_det_step_sends_string_value() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/set_det_step"))
        .and(body_json(json!({"step": "2.5"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Detection interval set to 2.5 seconds"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.set_det_step(2.5).await.unwrap();
    assert!(resp.is_success());
}

#[tokio::test]
async fn test_set_det_step_failure_status_is_not_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/set_det_step"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failure",
            "message": "Step out of range"
        })))
        .mount(&server)
        .await;

    let resp = client.set_det_step(0.2).await.unwrap();
    assert!(!resp.is_success());
    assert_eq!(resp.message.as_deref(), Some("Step out of range"));
}

// ── Control ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_and_end_patrol() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/start_patrol"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Patrol started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/end_patrol"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let started = client.start_patrol().await.unwrap();
    assert_eq!(started.message.as_deref(), Some("Patrol started"));

    let ended = client.end_patrol().await.unwrap();
    assert_eq!(ended.message.as_deref(), Some("ok"));
}

// ── Results ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_results_keeps_server_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/get_result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"time": "2024-05-01 10:00:00.000", "path": "http://cam/result_files/a.jpg"},
            {"time": "2024-05-01 10:00:05.000", "path": "http://cam/result_files/b.jpg"}
        ])))
        .mount(&server)
        .await;

    let results = client.get_results().await.unwrap();
    assert_eq!(
        results,
        vec![
            ResultEntry {
                path: "http://cam/result_files/a.jpg".into(),
                time: "2024-05-01 10:00:00.000".into(),
            },
            ResultEntry {
                path: "http://cam/result_files/b.jpg".into(),
                time: "2024-05-01 10:00:05.000".into(),
            },
        ]
    );
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_prefers_json_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/get_result"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "Camera offline"})),
        )
        .mount(&server)
        .await;

    let err = client.get_results().await.unwrap_err();
    match err {
        Error::Server { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Camera offline");
        }
        other => panic!("expected Server error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_strips_html_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/get_status"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_raw("<html><body><h1>Internal Server Error</h1></body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();
    assert_eq!(err.to_string(), "Internal Server Error");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_server_error_empty_body_is_generic() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/start_patrol"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.start_patrol().await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed: 500 Internal Server Error");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unexpected_shape_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/get_result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"oops": 1})))
        .mount(&server)
        .await;

    let result = client.get_results().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 9 on the loopback interface in CI.
    let client = PatrolClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
    );

    let result = client.get_status().await;
    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}
