use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::extract::ExtractError;
use crate::ingest::multipart::MultipartError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Only input and infrastructure failures live here. Model failures are
/// absorbed by the analysis pipeline and never reach the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed request: {0}")]
    MalformedRequest(#[from] MultipartError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, summary, message) = match &self {
            AppError::MalformedRequest(e) => {
                tracing::warn!("Rejected upload: {e}");
                (StatusCode::BAD_REQUEST, "Malformed request", e.to_string())
            }
            AppError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to analyze resume",
                    "The uploaded file could not be read".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process request",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": summary,
            "message": message
        }));

        (status, body).into_response()
    }
}
