//! Axum route handlers for the Analysis API.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use bytes::Bytes;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::analysis::models::AnalysisResult;
use crate::analysis::pipeline::analyze;
use crate::errors::AppError;
use crate::ingest::extract::extract_from_path;
use crate::ingest::multipart::{boundary_from_content_type, decode_upload, MultipartError};
use crate::ingest::stage_upload;
use crate::state::AppState;

/// POST /api/analyze-resume
///
/// Accepts one uploaded file and always answers with a full analysis, unless
/// the upload itself is malformed or unreadable.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalysisResult>, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze_resume", %request_id);
    analyze_upload(state, headers, body).instrument(span).await
}

async fn analyze_upload(
    state: AppState,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalysisResult>, AppError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or(MultipartError::MissingContentType)?;
    let boundary = boundary_from_content_type(content_type)?;
    let upload = decode_upload(&body, &boundary)?;
    info!(
        "File uploaded: {} ({}, {} bytes)",
        upload.filename,
        upload.content_type.as_deref().unwrap_or("unknown type"),
        upload.bytes.len()
    );

    // The staged file is deleted when `staged` drops, on success or error.
    let text = {
        let staged = stage_upload(&upload).await?;
        extract_from_path(staged.path(), &upload.filename).await?
    };
    info!(
        "Text extraction complete: {} characters ({:?})",
        text.char_count(),
        text.origin()
    );

    let analysis = analyze(state.llm.as_deref(), text.as_str()).await;
    info!("Analysis complete (source: {:?})", analysis.source);

    Ok(Json(analysis.result))
}
