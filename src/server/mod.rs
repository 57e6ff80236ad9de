//! HTTP service layer
//!
//! Thin plumbing over the bridge: two data endpoints (`/read`, `/save`),
//! a banner and a health check. Every device access goes through
//! [`SensorBridge`]; handlers hop to the blocking pool because one guarded
//! serial read is synchronous and can hold the lock for seconds.

use crate::core::bridge::SensorBridge;
use crate::core::frame::{ReadOutcome, ReadStatus};
use crate::core::link::LinkError;
use crate::core::recorder::CsvRecorder;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    bridge: Arc<SensorBridge>,
    recorder: Arc<Mutex<CsvRecorder>>,
}

impl AppState {
    /// Bundle the bridge and recorder for the router
    pub fn new(bridge: Arc<SensorBridge>, recorder: CsvRecorder) -> Self {
        Self {
            bridge,
            recorder: Arc::new(Mutex::new(recorder)),
        }
    }
}

/// Build the service router. CORS is wide open: the dataset-collection
/// frontend is served from anywhere on the LAN.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/read", get(read_once))
        .route("/save", get(read_and_save))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the bridge API until ctrl-c, then close the serial link
pub async fn serve(listen: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let bridge = state.bridge.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!(%listen, "glovebridge API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The process is going down; release the port exactly once.
    bridge.close();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown requested");
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "glovebridge serial API. GET /read or /save",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "connected": state.bridge.is_open(),
    }))
}

/// Return the latest reading without touching the dataset
async fn read_once(State(state): State<AppState>) -> Response {
    match guarded_read(&state).await {
        Ok(outcome) => reading_response(&outcome),
        Err(response) => response,
    }
}

/// Read one frame and append it to the dataset CSV
async fn read_and_save(State(state): State<AppState>) -> Response {
    let outcome = match guarded_read(&state).await {
        Ok(outcome) => outcome,
        Err(response) => return response,
    };

    if outcome.status != ReadStatus::Complete {
        return reading_response(&outcome);
    }

    let appended = state.recorder.lock().append(&outcome.reading);
    match appended {
        Ok(timestamp) => (
            StatusCode::OK,
            Json(json!({
                "message": "saved",
                "timestamp": timestamp,
                "data": outcome.reading,
            })),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to record reading");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("failed to record reading: {err}") })),
            )
                .into_response()
        }
    }
}

/// Run one guarded frame attempt on the blocking pool
async fn guarded_read(state: &AppState) -> Result<ReadOutcome, Response> {
    let bridge = state.bridge.clone();
    match tokio::task::spawn_blocking(move || bridge.latest_reading()).await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(err)) => Err(link_error_response(&err)),
        Err(join_err) => {
            error!(error = %join_err, "reader task failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "reader task failed" })),
            )
                .into_response())
        }
    }
}

fn reading_response(outcome: &ReadOutcome) -> Response {
    match outcome.status {
        ReadStatus::Complete => (
            StatusCode::OK,
            Json(json!({
                "data": outcome.reading,
                "status": outcome.status,
            })),
        )
            .into_response(),
        ReadStatus::Incomplete => {
            let missing: Vec<String> = outcome
                .reading
                .missing()
                .iter()
                .map(ToString::to_string)
                .collect();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("incomplete reading, missing: {}", missing.join(", ")),
                    "data": outcome.reading,
                    "status": outcome.status,
                })),
            )
                .into_response()
        }
    }
}

fn link_error_response(err: &LinkError) -> Response {
    let status = if err.is_open_failure() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
