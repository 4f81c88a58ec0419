use super::models::{
    BulkStatusRequest, CompanyStatus, CreateCompanyRequest, StatusFilter, UpdateCompanyRequest,
};
use super::services::CompaniesService;
use crate::auth::{AuthedUser, MaybeAuthedUser};
use crate::common::uploads::{read_file_field, remove_file, save_file, serve_file, sniff_image};
use crate::common::{generate_file_name, ApiError, AppState, EntityPrefix, PageQuery};
use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

fn parse_status(value: &str) -> Result<CompanyStatus, ApiError> {
    CompanyStatus::parse(value).ok_or_else(|| {
        ApiError::BadRequest("Status must be one of: pending, approved, rejected".to_string())
    })
}

// ============================================================================
// Company Account Handlers
// ============================================================================

/// POST /api/companies - Register the caller's company (starts pending)
pub async fn create_company(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_company()?;

    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    let company = companies_service.create_company(&user.id, request).await?;

    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/companies/mine
pub async fn get_my_company(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_company()?;

    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    let company = companies_service
        .find_by_owner(&user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You have not created a company yet".to_string()))?;

    Ok(Json(companies_service.to_response(company).await?))
}

/// PUT /api/companies/:id
pub async fn update_company(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(company_id): Path<String>,
    Json(request): Json<UpdateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    let company = companies_service
        .update_company(&company_id, &user.id, request)
        .await?;

    Ok(Json(company))
}

/// POST /api/companies/:id/logo - multipart field `logo`
pub async fn upload_logo(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(company_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    let company = companies_service.get_company_by_id(&company_id).await?;
    if company.owner_id != user.id {
        return Err(ApiError::Forbidden(
            "You are not allowed to edit this company.".to_string(),
        ));
    }

    let upload = read_file_field(&mut multipart, "logo", MAX_LOGO_BYTES).await?;
    let extension = sniff_image(&upload.data).ok_or_else(|| {
        ApiError::BadRequest("Logo must be a PNG, JPEG, GIF or WebP image".to_string())
    })?;

    let filename = generate_file_name(EntityPrefix::Logo, extension);
    save_file(&app_state.logos_dir, &filename, &upload.data).await?;

    if let Some(previous) = companies_service.set_logo(&company.id, &filename).await? {
        remove_file(&app_state.logos_dir, &previous).await;
    }

    info!(company_id = %company.id, filename = %filename, "Company logo uploaded");

    Ok(Json(json!({
        "logo": filename,
        "logo_url": format!("/api/logos/{}", filename),
    })))
}

/// GET /api/logos/:filename
pub async fn serve_logo(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let logos_dir = state.read().await.logos_dir.clone();
    serve_file(&logos_dir, &filename).await
}

// ============================================================================
// Public Directory Handlers
// ============================================================================

/// GET /api/companies - Approved companies only
pub async fn list_companies(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    let page = companies_service.list_approved(query.pagination()).await?;

    Ok(Json(page))
}

/// GET /api/companies/:id - Unapproved companies are visible to their owner and admins only
pub async fn get_company(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    MaybeAuthedUser(viewer): MaybeAuthedUser,
    Path(company_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    let company = companies_service.get_company_by_id(&company_id).await?;

    let privileged = viewer
        .as_ref()
        .is_some_and(|v| v.is_admin || v.id == company.owner_id);
    if !company.is_approved() && !privileged {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    Ok(Json(companies_service.to_response(company).await?))
}

// ============================================================================
// Admin Moderation Handlers
// ============================================================================

/// GET /api/admin/companies?status=pending
pub async fn admin_list_companies(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let status = filter.status.as_deref().map(parse_status).transpose()?;

    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    Ok(Json(companies_service.list_all(status).await?))
}

/// POST /api/admin/companies/:id/approve
pub async fn approve_company(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(company_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    let company = companies_service
        .set_status(&company_id, CompanyStatus::Approved)
        .await?;

    Ok(Json(company))
}

/// POST /api/admin/companies/:id/reject
pub async fn reject_company(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(company_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    let company = companies_service
        .set_status(&company_id, CompanyStatus::Rejected)
        .await?;

    Ok(Json(company))
}

/// POST /api/admin/companies/bulk-status
pub async fn bulk_update_status(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<BulkStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let status = parse_status(&request.status)?;
    if request.ids.is_empty() {
        return Err(ApiError::BadRequest("No companies selected".to_string()));
    }

    let app_state = state.read().await;
    let companies_service = CompaniesService::new(app_state.db.clone());

    let updated = companies_service.bulk_set_status(&request.ids, status).await?;

    Ok(Json(json!({ "updated": updated })))
}
