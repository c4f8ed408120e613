use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::path::Path;
use uuid::Uuid;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "print-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Ready once a file can be created and removed in the temp directory.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match check_writable(state.pipeline.tmp_dir()).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Temp directory unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Writes and deletes a scratch file. The name carries no artifact
/// extension, so the reaper never touches it.
pub async fn check_writable(dir: &Path) -> std::io::Result<()> {
    let scratch = dir.join(format!(".ready-{}", Uuid::new_v4().simple()));
    tokio::fs::write(&scratch, b"ok").await?;
    tokio::fs::remove_file(&scratch).await
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
