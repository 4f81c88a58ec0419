// src/profile/handlers.rs

use axum::{
    extract::{Extension, Multipart, Path},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{CompletionResponse, ProfileResponse, UpdateProfileRequest};
use super::services::ProfileService;
use crate::auth::AuthedUser;
use crate::common::helpers::is_safe_filename;
use crate::common::uploads::{read_file_field, remove_file, save_file, serve_file, sniff_image};
use crate::common::{generate_file_name, ApiError, AppState, EntityPrefix};
use crate::matching::advice::{missing_profile_fields, profile_completeness};
use crate::matching::ResumeAnalysisService;

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_PICTURE_BYTES: usize = 2 * 1024 * 1024;

/// Text of a PDF, or empty when extraction fails. Runs on the blocking pool
/// since the parser is CPU-bound and may panic on malformed input.
async fn extract_pdf_text(data: Vec<u8>) -> String {
    match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await {
        Ok(Ok(text)) => text.trim().to_string(),
        Ok(Err(e)) => {
            warn!(error = %e, "PDF text extraction failed");
            String::new()
        }
        Err(e) => {
            warn!(error = %e, "PDF text extraction aborted");
            String::new()
        }
    }
}

/// GET /api/profile
pub async fn get_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();

    let profile = ProfileService::new(db.clone()).get_profile(&user.id).await?;
    let analysis = ResumeAnalysisService::new(db).latest(&user.id).await?;

    Ok(Json(ProfileResponse::new(profile, analysis)))
}

/// PUT /api/profile
pub async fn update_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let analyses = ResumeAnalysisService::new(db.clone());

    let (profile, skills_changed) = ProfileService::new(db)
        .update_profile(&user.id, request)
        .await?;

    let analysis = if skills_changed {
        Some(analyses.refresh(&profile).await?)
    } else {
        analyses.latest(&user.id).await?
    };

    Ok(Json(ProfileResponse::new(profile, analysis)))
}

/// POST /api/profile/resume - multipart field `resume` (PDF, max 5 MB)
pub async fn upload_resume(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let file = read_file_field(&mut multipart, "resume", MAX_RESUME_BYTES).await?;
    if file.extension().as_deref() != Some("pdf") {
        return Err(ApiError::BadRequest("Resume must be a PDF file".to_string()));
    }

    let filename = generate_file_name(EntityPrefix::Resume, "pdf");
    save_file(&state.resumes_dir, &filename, &file.data).await?;
    let text = extract_pdf_text(file.data).await;

    let profiles = ProfileService::new(state.db.clone());
    if let Some(previous) = profiles.set_resume(&user.id, &filename, &text).await? {
        remove_file(&state.resumes_dir, &previous).await;
    }

    let profile = profiles.get_profile(&user.id).await?;
    let analysis = ResumeAnalysisService::new(state.db.clone())
        .refresh(&profile)
        .await?;

    info!(user_id = %user.id, filename = %filename, text_chars = text.len(), "Resume uploaded");

    Ok(Json(json!({
        "resume_file": filename,
        "resume_url": format!("/uploads/resumes/{}", filename),
        "text_extracted": !text.is_empty(),
        "analysis": analysis,
    })))
}

/// POST /api/profile/picture - multipart field `picture` (image, max 2 MB)
pub async fn upload_picture(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let file = read_file_field(&mut multipart, "picture", MAX_PICTURE_BYTES).await?;
    let extension = sniff_image(&file.data).ok_or_else(|| {
        ApiError::BadRequest("Profile picture must be a PNG, JPEG, GIF or WebP image".to_string())
    })?;

    let filename = generate_file_name(EntityPrefix::Picture, extension);
    save_file(&state.pictures_dir, &filename, &file.data).await?;

    if let Some(previous) = ProfileService::new(state.db.clone())
        .set_picture(&user.id, &filename)
        .await?
    {
        remove_file(&state.pictures_dir, &previous).await;
    }

    info!(user_id = %user.id, filename = %filename, "Profile picture uploaded");

    Ok(Json(json!({
        "profile_picture": filename,
        "picture_url": format!("/uploads/pictures/{}", filename),
    })))
}

/// GET /uploads/resumes/:filename
pub async fn serve_resume(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_safe_filename(&filename) {
        return Err(ApiError::BadRequest("Invalid filename".to_string()));
    }
    let state = state_lock.read().await.clone();

    if !ProfileService::new(state.db.clone())
        .can_read_resume(&user, &filename)
        .await?
    {
        warn!(user_id = %user.id, filename = %filename, "Resume access denied");
        return Err(ApiError::Forbidden(
            "You are not allowed to view this resume".to_string(),
        ));
    }

    serve_file(&state.resumes_dir, &filename).await
}

/// GET /uploads/pictures/:filename
pub async fn serve_picture(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let dir = state_lock.read().await.pictures_dir.clone();
    serve_file(&dir, &filename).await
}

/// GET /api/profile/completion
pub async fn get_completion(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let profile = ProfileService::new(db).get_profile(&user.id).await?;

    Ok(Json(CompletionResponse {
        profile_completeness: profile_completeness(&profile),
        missing: missing_profile_fields(&profile),
    }))
}
