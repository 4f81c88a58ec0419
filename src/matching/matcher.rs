// src/matching/matcher.rs
//! Pluggable candidate/job scoring.
//!
//! `KeywordMatcher` is deterministic and offline. `AiMatcher` asks the
//! configured chat model and degrades to the keyword report on any failure.
//! `AppState` carries one as `Arc<dyn Matcher>`, chosen at startup from
//! `MATCHER_BACKEND`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use super::text::{compute_resume_keywords, extract_skills_from_text, score_job_match, FUZZY_THRESHOLD};
use crate::jobs::Job;
use crate::profile::models::SeekerProfile;
use crate::services::openai::{OpenAIError, OpenAIService, TextGenerationPurpose};

/// What a matcher knows about the seeker
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub user_id: String,
    pub skills_csv: String,
    pub resume_text: String,
}

impl Candidate {
    pub fn from_profile(profile: &SeekerProfile) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            skills_csv: profile.skills.clone().unwrap_or_default(),
            resume_text: profile.resume_text().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub score: u8,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub backend: String,
    pub summary: Option<String>,
}

#[async_trait]
pub trait Matcher: Send + Sync {
    async fn score(&self, candidate: &Candidate, job: &Job) -> MatchReport;

    fn backend_name(&self) -> &'static str;
}

// ============================================================================
// Keyword backend
// ============================================================================

pub struct KeywordMatcher;

impl KeywordMatcher {
    pub fn report(candidate: &Candidate, job: &Job) -> MatchReport {
        let (skills, vector) = compute_resume_keywords(&candidate.skills_csv, &candidate.resume_text);
        let job_text = job.matching_text();
        let score = score_job_match(&vector, &job_text);

        let have: HashSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();
        let (matched_skills, missing_skills) = extract_skills_from_text(&job_text, FUZZY_THRESHOLD)
            .into_iter()
            .partition(|skill| have.contains(skill));

        MatchReport {
            score,
            matched_skills,
            missing_skills,
            backend: "keyword".to_string(),
            summary: None,
        }
    }
}

#[async_trait]
impl Matcher for KeywordMatcher {
    async fn score(&self, candidate: &Candidate, job: &Job) -> MatchReport {
        Self::report(candidate, job)
    }

    fn backend_name(&self) -> &'static str {
        "keyword"
    }
}

// ============================================================================
// AI backend
// ============================================================================

pub struct AiMatcher {
    openai: Arc<OpenAIService>,
}

#[derive(Debug, Deserialize)]
struct AiVerdict {
    score: f64,
    summary: Option<String>,
}

/// Pulls the first `{...}` object out of a model reply, which may be wrapped
/// in code fences or prose.
fn parse_ai_reply(reply: &str) -> Result<(u8, Option<String>), OpenAIError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let body = match (start, end) {
        (Some(s), Some(e)) if s < e => &reply[s..=e],
        _ => {
            return Err(OpenAIError::InvalidResponse(
                "Reply contains no JSON object".to_string(),
            ))
        }
    };

    let verdict: AiVerdict =
        serde_json::from_str(body).map_err(|e| OpenAIError::InvalidResponse(e.to_string()))?;
    if !verdict.score.is_finite() {
        return Err(OpenAIError::InvalidResponse("Score is not a number".to_string()));
    }

    let score = verdict.score.round().clamp(0.0, 100.0) as u8;
    Ok((score, verdict.summary.filter(|s| !s.trim().is_empty())))
}

impl AiMatcher {
    pub fn new(openai: Arc<OpenAIService>) -> Self {
        Self { openai }
    }

    async fn ask(&self, candidate: &Candidate, job: &Job, keyword: &MatchReport) -> Result<(u8, Option<String>), OpenAIError> {
        let context = json!({
            "candidate": {
                "skills": candidate.skills_csv,
                "resume": candidate.resume_text.chars().take(4000).collect::<String>(),
            },
            "job": {
                "title": job.title,
                "description": job.description,
                "requirements": job.requirements,
                "responsibilities": job.responsibilities,
                "experience_level": job.experience_level,
            },
            "keyword_score": keyword.score,
        });

        let reply = self
            .openai
            .generate_text(
                TextGenerationPurpose::ResumeMatching,
                "Rate how well this candidate fits the job.",
                Some(context),
            )
            .await?;

        parse_ai_reply(&reply)
    }
}

#[async_trait]
impl Matcher for AiMatcher {
    async fn score(&self, candidate: &Candidate, job: &Job) -> MatchReport {
        let keyword = KeywordMatcher::report(candidate, job);

        match self.ask(candidate, job, &keyword).await {
            Ok((score, summary)) => {
                debug!(user_id = %candidate.user_id, job_id = %job.id, score, "AI match scored");
                MatchReport {
                    score,
                    summary,
                    backend: "ai".to_string(),
                    ..keyword
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    user_id = %candidate.user_id,
                    job_id = %job.id,
                    "AI matcher failed, using keyword score"
                );
                MatchReport {
                    summary: Some(format!("AI scoring unavailable ({}); keyword score used.", e)),
                    ..keyword
                }
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "ai"
    }
}

/// `"ai"` selects the AI backend; anything else the keyword one.
pub fn build_matcher(backend: &str, openai: Arc<OpenAIService>) -> Arc<dyn Matcher> {
    match backend.trim().to_lowercase().as_str() {
        "ai" => Arc::new(AiMatcher::new(openai)),
        _ => Arc::new(KeywordMatcher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::test_pool;
    use crate::services::SettingsService;

    fn job(requirements: &str) -> Job {
        Job {
            id: "J_TEST01".to_string(),
            title: "Backend Engineer".to_string(),
            slug: "backend-engineer".to_string(),
            company_id: "C_TEST01".to_string(),
            company_name: "Test".to_string(),
            company_logo: None,
            category_id: None,
            category_name: None,
            category_slug: None,
            description: "Build APIs".to_string(),
            requirements: requirements.to_string(),
            responsibilities: String::new(),
            salary_min: None,
            salary_max: None,
            employment_type: "full_time".to_string(),
            experience_level: "mid".to_string(),
            location: "Berlin".to_string(),
            remote_available: false,
            is_active: true,
            application_deadline: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn candidate(skills: &str) -> Candidate {
        Candidate {
            user_id: "U_TEST01".to_string(),
            skills_csv: skills.to_string(),
            resume_text: String::new(),
        }
    }

    #[tokio::test]
    async fn test_keyword_matcher_splits_skills() {
        let report = KeywordMatcher
            .score(&candidate("Python, Docker"), &job("python docker kubernetes"))
            .await;
        assert_eq!(report.backend, "keyword");
        assert_eq!(report.matched_skills, vec!["docker", "python"]);
        assert_eq!(report.missing_skills, vec!["kubernetes"]);
        assert!(report.score > 0 && report.score <= 100);
    }

    #[test]
    fn test_parse_ai_reply() {
        assert_eq!(
            parse_ai_reply("```json\n{\"score\": 87.4, \"summary\": \"Strong fit\"}\n```").unwrap(),
            (87, Some("Strong fit".to_string()))
        );
        assert_eq!(parse_ai_reply("{\"score\": 140}").unwrap(), (100, None));
        assert!(parse_ai_reply("no json here").is_err());
        assert!(parse_ai_reply("{\"summary\": \"missing score\"}").is_err());
    }

    #[tokio::test]
    async fn test_ai_matcher_falls_back_when_unconfigured() {
        let pool = test_pool().await;
        let settings = Arc::new(SettingsService::with_encryption(pool, None));
        // a stored blank key shadows any OPENAI_API_KEY in the environment
        settings.set_setting("openai_api_key", "", false, None).await.unwrap();
        let openai = Arc::new(OpenAIService::new(settings));
        let matcher = build_matcher("ai", openai);
        assert_eq!(matcher.backend_name(), "ai");

        let report = matcher.score(&candidate("Python"), &job("python")).await;
        let keyword = KeywordMatcher::report(&candidate("Python"), &job("python"));
        assert_eq!(report.backend, "keyword");
        assert_eq!(report.score, keyword.score);
        assert!(report.summary.unwrap().contains("keyword score used"));
    }

    #[tokio::test]
    async fn test_build_matcher_defaults_to_keyword() {
        let settings = Arc::new(SettingsService::with_encryption(test_pool().await, None));
        let openai = Arc::new(OpenAIService::new(settings));
        assert_eq!(build_matcher("keyword", openai.clone()).backend_name(), "keyword");
        assert_eq!(build_matcher("", openai).backend_name(), "keyword");
    }
}
