// src/utils/upload.rs

use std::path::Path;

use axum::body::Bytes;
use tokio::fs;

use crate::error::AppError;

/// A file part received from a multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Filename as sent by the client.
    pub file_name: String,
    pub bytes: Bytes,
}

/// Persists an optional upload into the flat `dir` and returns the path it was written to.
///
/// Returns `Ok(None)` when no file was sent or the browser sent an empty part.
/// The file keeps the client's name, so a later upload with the same name
/// replaces the earlier bytes. Only the last component of the client name is
/// used, keeping every write inside `dir`.
pub async fn save_upload(dir: &Path, upload: Option<Upload>) -> Result<Option<String>, AppError> {
    let Some(upload) = upload else {
        return Ok(None);
    };
    if upload.file_name.is_empty() {
        return Ok(None);
    }

    let file_name = Path::new(&upload.file_name)
        .file_name()
        .ok_or_else(|| AppError::BadRequest(format!("Invalid file name: {:?}", upload.file_name)))?;

    fs::create_dir_all(dir).await.map_err(|e| {
        tracing::error!("Failed to create upload directory {}: {:?}", dir.display(), e);
        AppError::InternalServerError(e.to_string())
    })?;

    let path = dir.join(file_name);
    fs::write(&path, &upload.bytes).await.map_err(|e| {
        tracing::error!("Failed to write upload {}: {:?}", path.display(), e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!(path = %path.display(), bytes = upload.bytes.len(), "Stored upload");

    Ok(Some(path.to_string_lossy().into_owned()))
}
