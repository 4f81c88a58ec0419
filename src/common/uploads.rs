// src/common/uploads.rs
//! Multipart reading, content sniffing and file serving for user uploads
//! (resumes, profile pictures, company logos).

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::Path;
use tracing::error;

use super::helpers::is_safe_filename;
use super::ApiError;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Body limit for a route that accepts one file of up to `max_file_bytes`.
/// Without it axum's 2 MB default cuts larger uploads off mid-stream.
pub fn upload_body_limit(max_file_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_file_bytes + MULTIPART_OVERHEAD)
}

/// One file pulled out of a multipart form
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn extension(&self) -> Option<String> {
        self.filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase())
    }
}

/// Reads the multipart field called `field_name`, skipping everything else.
pub async fn read_file_field(
    multipart: &mut Multipart,
    field_name: &str,
    max_bytes: usize,
) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;

        if data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }
        if data.len() > max_bytes {
            return Err(ApiError::BadRequest(format!(
                "File is too large (max {} MB)",
                max_bytes / (1024 * 1024)
            )));
        }

        return Ok(UploadedFile {
            filename,
            data: data.to_vec(),
        });
    }

    Err(ApiError::BadRequest(format!("No '{}' file provided", field_name)))
}

/// Returns the canonical extension for png, jpeg, gif and webp images.
pub fn sniff_image(data: &[u8]) -> Option<&'static str> {
    match infer::get(data)?.mime_type() {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

pub fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(|e| e.to_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

pub async fn save_file(dir: &Path, filename: &str, data: &[u8]) -> Result<(), ApiError> {
    tokio::fs::write(dir.join(filename), data).await.map_err(|e| {
        error!(error = %e, filename = %filename, "Failed to write upload");
        ApiError::InternalServer("Failed to save file".to_string())
    })
}

/// Best effort; a missing old file is not an error.
pub async fn remove_file(dir: &Path, filename: &str) {
    if is_safe_filename(filename) {
        let _ = tokio::fs::remove_file(dir.join(filename)).await;
    }
}

pub async fn serve_file(dir: &Path, filename: &str) -> Result<Response, ApiError> {
    if !is_safe_filename(filename) {
        return Err(ApiError::BadRequest("Invalid filename".to_string()));
    }

    let content = match tokio::fs::read(dir.join(filename)).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("File not found".to_string()))
        }
        Err(e) => {
            error!(error = %e, filename = %filename, "Failed to read upload");
            return Err(ApiError::InternalServer("Failed to read file".to_string()));
        }
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(filename))],
        content,
    )
        .into_response())
}
