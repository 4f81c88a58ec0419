// src/assistant/handlers.rs

use axum::{extract::Extension, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::rules::{suggested_questions, AssistantProfile, ChatReply};
use super::services::CareerAssistantService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, ValidationResult};
use crate::matching::ResumeAnalysisService;
use crate::profile::ProfileService;

const MAX_QUESTION_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

async fn load_profile(state: &AppState, user_id: &str) -> Result<AssistantProfile, ApiError> {
    let profile = ProfileService::new(state.db.clone()).get_profile(user_id).await?;
    let analysis = ResumeAnalysisService::new(state.db.clone()).latest(user_id).await?;
    Ok(AssistantProfile::new(&profile, analysis))
}

/// POST /api/assistant/chat
pub async fn chat(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_seeker()?;

    let question = payload.question.trim();
    let mut validation = ValidationResult::new();
    if question.is_empty() {
        validation.add_error("question", "Question is required");
    } else if question.chars().count() > MAX_QUESTION_CHARS {
        validation.add_error("question", "Question must be at most 1000 characters");
    }
    if !validation.is_valid {
        return Err(validation.into());
    }

    let state = state_lock.read().await.clone();
    let profile = match load_profile(&state, &user.id).await {
        Ok(profile) => profile,
        Err(e) => {
            error!(user_id = %user.id, error = %e, "Assistant could not load profile");
            return Ok(Json(ChatReply::error()));
        }
    };

    let reply = CareerAssistantService::new(state.settings_service.clone(), state.openai_service.clone())
        .reply(question, &profile)
        .await;

    info!(user_id = %user.id, kind = reply.kind, source = reply.source, "Assistant answered");
    Ok(Json(reply))
}

/// GET /api/assistant/suggestions
pub async fn suggestions(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_seeker()?;
    let state = state_lock.read().await.clone();
    let profile = load_profile(&state, &user.id).await?;

    Ok(Json(json!({ "suggestions": suggested_questions(&profile) })))
}
