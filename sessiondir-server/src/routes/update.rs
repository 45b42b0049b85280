//! Update endpoints (trigger an ingest run, read the last summary)

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use sessiondir_core::process;
use sessiondir_core::summary::UpdateSummary;
use sessiondir_core::update::Updater;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/update", post(update))
        .route("/api/status", get(status))
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<UpdateSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    fn failure(message: &str, error: String) -> Self {
        ApiResponse {
            success: false,
            message: Some(message.to_string()),
            error: Some(error),
            ..ApiResponse::default()
        }
    }
}

/// POST /api/update - Fetch new events and sessions, then rebuild the dataset
///
/// The run is spawned so that it completes even when the client goes away.
async fn update(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse>) {
    info!("Manual update requested via API");

    let run = tokio::spawn(async move {
        let _running = state.update_lock().lock().await;
        run_update(&state).await
    });

    match run.await.map_err(anyhow::Error::from).and_then(|result| result) {
        Ok(summary) => {
            info!("Update completed successfully");
            let body = ApiResponse {
                success: true,
                message: Some("Update completed successfully".to_string()),
                summary: Some(summary),
                ..ApiResponse::default()
            };
            (StatusCode::OK, Json(body))
        }
        Err(e) => {
            error!("Update failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure("Update failed", format!("{e:#}"))),
            )
        }
    }
}

async fn run_update(state: &AppState) -> anyhow::Result<UpdateSummary> {
    let sessiondir = state.sessiondir();
    let updater = Updater::new(sessiondir, sessiondir.api_client()?);
    let report = updater.run().await?;

    let blocking = state.clone();
    tokio::task::spawn_blocking(move || process::process(blocking.sessiondir())).await??;

    Ok(report.summary)
}

/// GET /api/status - Summary of the last update run
async fn status(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse>) {
    let now = Utc::now();

    let summary = match UpdateSummary::load(&state.sessiondir().update_summary_path()) {
        Ok(Some(summary)) => summary.with_message("Update summary loaded successfully"),
        Ok(None) => UpdateSummary::empty(now).with_message("No update summary available"),
        Err(e) => {
            error!("Could not read update summary: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure("Failed to get status", e.to_string())),
            );
        }
    };

    let body = ApiResponse {
        success: true,
        summary: Some(summary),
        server_time: Some(now),
        ..ApiResponse::default()
    };
    (StatusCode::OK, Json(body))
}
