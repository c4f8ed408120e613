use crate::dtos::PrintResponse;
use crate::models::RangeBound;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::path::PathBuf;
use thiserror::Error;

/// Every way a print request can fail. Each variant maps to a stable `kind`
/// string that clients can match on.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error("{number} {bound}")]
    OutOfRange { number: String, bound: RangeBound },

    #[error("failed to render markup to {}: {reason}", .path.display())]
    RenderFailed { path: PathBuf, reason: String },

    #[error("{program} failed: {reason}")]
    ConvertFailed { program: String, reason: String },

    #[error("print command `{command}` failed: {reason}")]
    PrintFailed { command: String, reason: String },

    #[error("{0}")]
    NotFound(String),
}

impl PrintError {
    pub fn kind(&self) -> &'static str {
        match self {
            PrintError::OutOfRange { .. } => "out_of_range",
            PrintError::RenderFailed { .. } => "render_failed",
            PrintError::ConvertFailed { .. } => "convert_failed",
            PrintError::PrintFailed { .. } => "print_failed",
            PrintError::NotFound(_) => "not_found",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PrintError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for PrintError {
    fn into_response(self) -> Response {
        tracing::info!(kind = self.kind(), error = %self, "failure");
        (self.status_code(), Json(PrintResponse::failure(&self))).into_response()
    }
}
