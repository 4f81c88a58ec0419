// src/applications/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::ApplicationStatus;
use crate::matching::MatchReport;
use crate::profile::SeekerProfile;

// ============================================================================
// Stored rows
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: String,
    pub user_id: String,
    pub job_id: String,
    pub status: String,
    pub cover_letter: Option<String>,
    pub match_score: Option<i64>,
    pub applied_at: String,
    pub updated_at: String,
}

impl Application {
    /// Stored statuses are constrained by the schema; anything else reads as
    /// submitted.
    pub fn status(&self) -> ApplicationStatus {
        ApplicationStatus::parse(&self.status).unwrap_or(ApplicationStatus::Submitted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusHistoryEntry {
    pub id: String,
    pub application_id: String,
    pub status: String,
    pub changed_by: String,
    pub notes: Option<String>,
    pub changed_at: String,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: String,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReopenRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicantsQuery {
    pub ranked: Option<bool>,
}

// ============================================================================
// Responses
// ============================================================================

/// Application joined with the posting it targets
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub job_title: String,
    pub job_slug: String,
    pub company_name: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    pub status_history: Vec<StatusHistoryEntry>,
}

/// Applicant row as seen by the hiring company
#[derive(Debug, Clone, FromRow)]
pub struct ApplicantRow {
    #[sqlx(flatten)]
    pub application: Application,
    pub username: String,
    pub account_email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub profile_picture: Option<String>,
    pub resume_file: Option<String>,
    pub resume_text: Option<String>,
}

impl ApplicantRow {
    pub fn profile(&self) -> SeekerProfile {
        SeekerProfile {
            user_id: self.application.user_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.profile_email.clone(),
            skills: self.skills.clone(),
            profile_picture: self.profile_picture.clone(),
            resume_file: self.resume_file.clone(),
            resume_text: self.resume_text.clone(),
            ..SeekerProfile::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicantInfo {
    pub username: String,
    pub name: Option<String>,
    pub email: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingBreakdown {
    pub score: u8,
    /// Percentage of the posting's skills the applicant covers
    pub skills_match: u8,
    pub experience_level: &'static str,
    pub resume_completeness: u8,
    pub backend: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: Option<String>,
}

impl RankingBreakdown {
    pub fn new(report: MatchReport, experience_level: &'static str, resume_completeness: u8) -> Self {
        let total = report.matched_skills.len() + report.missing_skills.len();
        let skills_match = if total == 0 {
            0
        } else {
            (report.matched_skills.len() as f64 * 100.0 / total as f64).round() as u8
        };

        Self {
            score: report.score,
            skills_match,
            experience_level,
            resume_completeness,
            backend: report.backend,
            matched_skills: report.matched_skills,
            missing_skills: report.missing_skills,
            summary: report.summary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicantEntry {
    pub application_id: String,
    pub user_id: String,
    pub status: String,
    pub cover_letter: Option<String>,
    pub match_score: Option<i64>,
    pub applied_at: String,
    pub applicant: ApplicantInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<RankingBreakdown>,
}

impl ApplicantEntry {
    pub fn new(row: &ApplicantRow, ranking: Option<RankingBreakdown>) -> Self {
        let profile = row.profile();
        let email = profile
            .email
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| row.account_email.clone());

        Self {
            application_id: row.application.id.clone(),
            user_id: row.application.user_id.clone(),
            status: row.application.status.clone(),
            cover_letter: row.application.cover_letter.clone(),
            match_score: row.application.match_score,
            applied_at: row.application.applied_at.clone(),
            applicant: ApplicantInfo {
                username: row.username.clone(),
                name: profile.full_name(),
                email,
                skills: profile.skills_list(),
            },
            ranking,
        }
    }
}
