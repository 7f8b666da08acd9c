// Upload intake: multipart decoding, temp-file staging, and text extraction.

pub mod extract;
pub mod multipart;

use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::ingest::multipart::UploadedFile;

/// Writes an upload to a uniquely named temp file.
/// The file is removed when the returned guard drops, whichever path the request takes.
pub async fn stage_upload(upload: &UploadedFile) -> Result<NamedTempFile> {
    let suffix = Path::new(&upload.filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&suffix)
        .tempfile()
        .context("Failed to create temp file for upload")?;

    tokio::fs::write(staged.path(), &upload.bytes)
        .await
        .with_context(|| format!("Failed to write upload to {}", staged.path().display()))?;

    debug!(
        "Staged {} ({} bytes) at {}",
        upload.filename,
        upload.bytes.len(),
        staged.path().display()
    );
    Ok(staged)
}
