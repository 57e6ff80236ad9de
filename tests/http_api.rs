//! Integration tests for the HTTP service layer
//!
//! The router is exercised in-process with `tower::ServiceExt::oneshot`
//! against scripted links, so no hardware and no socket are needed.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use glovebridge::core::link::{LinkError, SensorLink};
use glovebridge::server::{router, AppState};
use glovebridge::{CsvRecorder, SensorBridge};
use std::collections::VecDeque;
use std::sync::Arc;
use tower::ServiceExt;

/// Link that replays a fixed list of lines, then goes silent
struct ScriptedLink {
    script: VecDeque<Result<Option<String>, LinkError>>,
}

impl ScriptedLink {
    fn with_lines(lines: &[&str]) -> Self {
        Self {
            script: lines
                .iter()
                .map(|s| Ok(Some((*s).to_string())))
                .collect(),
        }
    }

    fn failing_to_open() -> Self {
        Self {
            script: VecDeque::new(),
        }
    }
}

impl SensorLink for ScriptedLink {
    fn ensure_open(&mut self) -> Result<(), LinkError> {
        if self.script.is_empty() {
            return Err(LinkError::PortNotFound("/dev/ttyUSB9".to_string()));
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, LinkError> {
        self.script.pop_front().unwrap_or(Ok(None))
    }

    fn close(&mut self) {}

    fn is_open(&self) -> bool {
        !self.script.is_empty()
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

fn full_frame() -> Vec<&'static str> {
    vec!["Gyro:0.1,0.2,0.3", "Flex:1,2,3,4,5", "Accel:9.8,0.0,0.0"]
}

fn state_with(link: ScriptedLink, dir: &tempfile::TempDir) -> AppState {
    let bridge = Arc::new(SensorBridge::with_link(Box::new(link), 20));
    let recorder = CsvRecorder::open(dir.path().join("dataset.csv")).unwrap();
    AppState::new(bridge, recorder)
}

async fn get_json(
    app: axum::Router,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_read_returns_complete_reading() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(state_with(ScriptedLink::with_lines(&full_frame()), &dir));

    let (status, body) = get_json(app, "/read").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "complete");
    assert_eq!(body["data"]["flex"], serde_json::json!([1.0, 2.0, 3.0, 4.0, 5.0]));
    assert_eq!(body["data"]["accel"], serde_json::json!([9.8, 0.0, 0.0]));
    assert_eq!(body["data"]["gyro"], serde_json::json!([0.1, 0.2, 0.3]));
}

#[tokio::test]
async fn test_read_reports_incomplete_with_partial_data() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(state_with(
        ScriptedLink::with_lines(&["Flex:1,2,3,4,5"]),
        &dir,
    ));

    let (status, body) = get_json(app, "/read").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "incomplete");
    assert!(body["error"].as_str().unwrap().contains("accel"));
    assert!(body["error"].as_str().unwrap().contains("gyro"));
    assert_eq!(body["data"]["flex"], serde_json::json!([1.0, 2.0, 3.0, 4.0, 5.0]));
}

#[tokio::test]
async fn test_read_when_port_cannot_open() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(state_with(ScriptedLink::failing_to_open(), &dir));

    let (status, body) = get_json(app, "/read").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("/dev/ttyUSB9"));
}

#[tokio::test]
async fn test_save_appends_one_csv_row() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(state_with(ScriptedLink::with_lines(&full_frame()), &dir));

    let (status, body) = get_json(app, "/save").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "saved");
    assert!(body["timestamp"].is_string());

    let content = std::fs::read_to_string(dir.path().join("dataset.csv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("timestamp,flex1"));
    assert!(lines[1].contains("9.8,0,0,0.1,0.2,0.3"));
}

#[tokio::test]
async fn test_save_rejects_incomplete_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(state_with(
        ScriptedLink::with_lines(&["Gyro:0.1,0.2,0.3"]),
        &dir,
    ));

    let (status, body) = get_json(app, "/save").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "incomplete");

    // Only the header was ever written.
    let content = std::fs::read_to_string(dir.path().join("dataset.csv")).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[tokio::test]
async fn test_health_and_banner() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(state_with(ScriptedLink::with_lines(&full_frame()), &dir));

    let (status, body) = get_json(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get_json(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("/read"));
}
