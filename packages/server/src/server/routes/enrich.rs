use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FullProcessResponse {
    Success { updated_rows: usize },
    Error { error: String },
}

/// Run one bounded enrichment pass over the sheet.
///
/// Returns 200 with the number of rows processed, or 500 with the error when
/// the run aborted (nothing is written in that case).
pub async fn full_process_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<FullProcessResponse>) {
    match state.job.run_once().await {
        Ok(report) => (
            StatusCode::OK,
            Json(FullProcessResponse::Success {
                updated_rows: report.processed,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Enrichment run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FullProcessResponse::Error {
                    error: e.to_string(),
                }),
            )
        }
    }
}
