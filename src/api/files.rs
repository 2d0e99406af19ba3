//! File download/upload endpoints.
//!
//! Download serves one fixed PDF regardless of the requested id; upload
//! accepts a single `application/pdf` multipart field up to the size cap.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::state::{AppState, MAX_UPLOAD_SIZE};
use crate::utils::ensure_dir_exists;

/// Name of the single file the download endpoint serves.
const DOWNLOAD_FILE: &str = "sample.pdf";

/// `GET /files/{file_id}` — the id is accepted but ignored.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(_file_id): Path<String>,
) -> Result<Response> {
    let path = state.config.file_dir.join(DOWNLOAD_FILE);
    if !path.exists() {
        return Err(AppError::NotFound("file not found".to_string()));
    }

    let bytes = tokio::fs::read(&path).await?;
    let content_type = mime_guess::from_path(&path).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILE),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `POST /files` — multipart upload of a single PDF.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        // Size cap guards against large upload attacks; only PDFs accepted
        if data.is_empty()
            || data.len() > MAX_UPLOAD_SIZE
            || content_type.as_deref() != Some("application/pdf")
        {
            return Err(AppError::UploadError(
                "no file or an invalid one has been inputted".to_string(),
            ));
        }

        ensure_dir_exists(&state.config.file_dir)?;
        let path = state
            .config
            .file_dir
            .join(format!("uploaded_file_{}.pdf", Uuid::new_v4()));
        tokio::fs::write(&path, &data).await?;

        return Ok("Your file has been uploaded successfully");
    }

    Err(AppError::UploadError("no file provided".to_string()))
}
