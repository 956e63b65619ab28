use std::path::Path;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::models::document::detect_extension;
use crate::models::result::PipelineResult;
use crate::state::AppState;

/// POST /api/v1/resumes/parse
///
/// Multipart upload with a `file` field. Rejections are reported inside the
/// `PipelineResult`, not as HTTP errors.
pub async fn handle_parse(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PipelineResult>, AppError> {
    // Refuse up front rather than queueing behind in-flight documents.
    let _permit = state
        .in_flight
        .try_acquire()
        .map_err(|_| AppError::ServiceBusy)?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file data: {e}")))?;
        upload = Some((filename, bytes.to_vec()));
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("Missing multipart field 'file'".to_string()))?;
    debug!("Received upload '{}' ({} bytes)", filename, bytes.len());

    // The temp file keeps the declared extension so adapter selection works.
    let suffix = detect_extension(Path::new(&filename), "");
    let staged = tempfile::Builder::new()
        .prefix("intake-")
        .suffix(&suffix)
        .tempfile()
        .context("Failed to create temp file for upload")?;
    tokio::fs::write(staged.path(), &bytes)
        .await
        .context("Failed to stage upload")?;

    let result = state.pipeline.process_document(staged.path(), &filename).await;
    Ok(Json(result))
}
