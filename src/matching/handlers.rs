// src/matching/handlers.rs

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::advice::{generate_career_advice, generate_profile_insights, stated_experience_years};
use super::analysis::ResumeAnalysisService;
use super::matcher::Candidate;
use super::quality::{analyze_resume_quality, check_ats_friendliness, resume_quality};
use super::recommend::{recommend_jobs, RecommendationPreferences};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::jobs::{JobView, JobsService};
use crate::profile::ProfileService;

/// Upper bound on postings considered for one recommendation run.
const RECOMMENDATION_POOL: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct CareerAdviceQuery {
    pub experience_years: Option<u32>,
}

/// GET /api/matching/jobs/:job_id
pub async fn match_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_seeker()?;
    let state = state_lock.read().await.clone();

    let job = JobsService::new(state.db.clone()).get_visible_job(&job_id).await?;
    let profile = ProfileService::new(state.db.clone()).get_profile(&user.id).await?;

    let report = state
        .matcher
        .score(&Candidate::from_profile(&profile), &job)
        .await;

    info!(user_id = %user.id, job_id = %job.id, score = report.score, backend = %report.backend, "Match computed");

    Ok(Json(json!({
        "job": JobView::from(job),
        "match": report,
    })))
}

/// GET /api/matching/recommendations?location=&min_salary=
pub async fn recommendations(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Query(prefs): Query<RecommendationPreferences>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_seeker()?;
    let db = state_lock.read().await.db.clone();

    let profile = ProfileService::new(db.clone()).get_profile(&user.id).await?;
    let jobs = JobsService::new(db).list_open_jobs(RECOMMENDATION_POOL).await?;

    let recommendations = recommend_jobs(&profile.skills_list(), jobs, &prefs);

    Ok(Json(json!({
        "recommendations": recommendations,
        "total": recommendations.len(),
    })))
}

/// GET /api/matching/resume-analysis
pub async fn resume_analysis(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_seeker()?;
    let db = state_lock.read().await.db.clone();

    let profile = ProfileService::new(db.clone()).get_profile(&user.id).await?;
    let analysis = ResumeAnalysisService::new(db).refresh(&profile).await?;
    let text = profile.resume_text();

    Ok(Json(json!({
        "has_resume_text": !text.trim().is_empty(),
        "quality": analyze_resume_quality(text),
        "ats": check_ats_friendliness(text),
        "writing_suggestions": resume_quality(text),
        "extracted_skills": analysis.extracted_skills,
        "inferred_skills": analysis.inferred_skills,
        "analyzed_at": analysis.analyzed_at,
    })))
}

/// GET /api/matching/career-advice?experience_years=
///
/// Without an explicit value the years stated in the resume are used.
pub async fn career_advice(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Query(query): Query<CareerAdviceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_seeker()?;
    let db = state_lock.read().await.db.clone();

    let profile = ProfileService::new(db).get_profile(&user.id).await?;
    let years = query
        .experience_years
        .or_else(|| stated_experience_years(profile.resume_text()))
        .unwrap_or(0);

    Ok(Json(json!({
        "experience_years": years,
        "advice": generate_career_advice(&profile.skills_list(), years),
    })))
}

/// GET /api/matching/profile-insights
pub async fn profile_insights(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_seeker()?;
    let db = state_lock.read().await.db.clone();

    let profile = ProfileService::new(db).get_profile(&user.id).await?;

    Ok(Json(generate_profile_insights(&profile)))
}
