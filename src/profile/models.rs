// src/profile/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::split_skills;
use crate::matching::quality::AtsReport;

// ============================================================================
// Seeker Profile Models
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct SeekerProfile {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub skills: Option<String>,
    pub date_of_birth: Option<String>,
    pub profile_picture: Option<String>,
    pub resume_file: Option<String>,
    pub resume_text: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl SeekerProfile {
    pub fn skills_list(&self) -> Vec<String> {
        self.skills.as_deref().map(split_skills).unwrap_or_default()
    }

    pub fn resume_text(&self) -> &str {
        self.resume_text.as_deref().unwrap_or("")
    }

    pub fn has_skills(&self) -> bool {
        !self.skills_list().is_empty()
    }

    pub fn has_resume(&self) -> bool {
        present(&self.resume_file)
    }

    pub fn has_picture(&self) -> bool {
        present(&self.profile_picture)
    }

    pub fn has_phone(&self) -> bool {
        present(&self.phone)
    }

    pub fn has_email(&self) -> bool {
        present(&self.email)
    }

    pub fn has_full_name(&self) -> bool {
        present(&self.first_name) && present(&self.last_name)
    }

    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub skills: Option<String>,
    pub date_of_birth: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.skills.is_none()
            && self.date_of_birth.is_none()
    }
}

// ============================================================================
// Resume Analysis Models
// ============================================================================

/// Stored row; list columns hold JSON arrays.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeAnalysisRow {
    pub extracted_skills: String,
    pub inferred_skills: String,
    pub quality_score: i64,
    pub ats_report: String,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub extracted_skills: Vec<String>,
    pub inferred_skills: Vec<String>,
    pub quality_score: i64,
    pub ats_report: AtsReport,
    pub analyzed_at: String,
}

impl From<ResumeAnalysisRow> for ResumeAnalysis {
    fn from(row: ResumeAnalysisRow) -> Self {
        Self {
            extracted_skills: serde_json::from_str(&row.extracted_skills).unwrap_or_default(),
            inferred_skills: serde_json::from_str(&row.inferred_skills).unwrap_or_default(),
            quality_score: row.quality_score,
            ats_report: serde_json::from_str(&row.ats_report).unwrap_or_default(),
            analyzed_at: row.analyzed_at,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: SeekerProfile,
    pub skills_list: Vec<String>,
    pub resume_url: Option<String>,
    pub picture_url: Option<String>,
    pub analysis: Option<ResumeAnalysis>,
}

impl ProfileResponse {
    pub fn new(profile: SeekerProfile, analysis: Option<ResumeAnalysis>) -> Self {
        Self {
            skills_list: profile.skills_list(),
            resume_url: profile
                .resume_file
                .as_ref()
                .map(|f| format!("/uploads/resumes/{}", f)),
            picture_url: profile
                .profile_picture
                .as_ref()
                .map(|f| format!("/uploads/pictures/{}", f)),
            profile,
            analysis,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub profile_completeness: u8,
    pub missing: Vec<&'static str>,
}
