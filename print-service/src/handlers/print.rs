use crate::dtos::PrintResponse;
use crate::error::PrintError;
use crate::models::{is_decimal_digits, PrintRequest};
use crate::services::record_print_outcome;
use crate::startup::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::Uri,
    Json,
};

/// `GET /print/:number`
pub async fn print_number(
    State(state): State<AppState>,
    number: Result<Path<String>, PathRejection>,
    uri: Uri,
) -> Result<Json<PrintResponse>, PrintError> {
    // only non-negative integers match the route
    let Path(number) = number.map_err(|_| not_found(&uri))?;
    if !is_decimal_digits(&number) {
        return Err(not_found(&uri));
    }

    tracing::info!(number = %number, "received request");

    let result = match PrintRequest::from_digits(&number) {
        Ok(request) => state.pipeline.run(request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(receipt) => {
            tracing::info!("success");
            record_print_outcome("success");
            Ok(Json(PrintResponse::success(receipt)))
        }
        Err(e) => {
            record_print_outcome(e.kind());
            Err(e)
        }
    }
}

/// Fallback for everything the router does not know.
pub async fn route_not_found(uri: Uri) -> PrintError {
    not_found(&uri)
}

fn not_found(uri: &Uri) -> PrintError {
    PrintError::NotFound(format!("no route for {}", uri.path()))
}
