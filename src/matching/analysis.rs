// src/matching/analysis.rs
//! Persisted resume analysis, one row per seeker

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, error};

use super::quality::{analyze_resume_quality, check_ats_friendliness};
use super::skills::{extract_skills, infer_skills_from_text};
use crate::common::{now_timestamp, ApiError};
use crate::profile::models::{ResumeAnalysis, ResumeAnalysisRow, SeekerProfile};

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::InternalServer(e.to_string()))
}

pub struct ResumeAnalysisService {
    db: SqlitePool,
}

impl ResumeAnalysisService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Pure part of a refresh: explicit and inferred skills, quality score and
    /// ATS report for the profile's current resume text.
    pub fn analyze(profile: &SeekerProfile) -> ResumeAnalysis {
        let text = profile.resume_text();
        ResumeAnalysis {
            extracted_skills: extract_skills(text, &profile.skills_list()),
            inferred_skills: infer_skills_from_text(text),
            quality_score: i64::from(analyze_resume_quality(text).score),
            ats_report: check_ats_friendliness(text),
            analyzed_at: now_timestamp(),
        }
    }

    pub async fn latest(&self, user_id: &str) -> Result<Option<ResumeAnalysis>, ApiError> {
        let row = sqlx::query_as::<_, ResumeAnalysisRow>(
            "SELECT extracted_skills, inferred_skills, quality_score, ats_report, analyzed_at FROM resume_analyses WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(ResumeAnalysis::from))
    }

    pub async fn refresh(&self, profile: &SeekerProfile) -> Result<ResumeAnalysis, ApiError> {
        let analysis = Self::analyze(profile);

        sqlx::query(
            r#"
            INSERT INTO resume_analyses (user_id, extracted_skills, inferred_skills, quality_score, ats_report, analyzed_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                extracted_skills = excluded.extracted_skills,
                inferred_skills = excluded.inferred_skills,
                quality_score = excluded.quality_score,
                ats_report = excluded.ats_report,
                analyzed_at = excluded.analyzed_at
            "#,
        )
        .bind(&profile.user_id)
        .bind(to_json(&analysis.extracted_skills)?)
        .bind(to_json(&analysis.inferred_skills)?)
        .bind(analysis.quality_score)
        .bind(to_json(&analysis.ats_report)?)
        .bind(&analysis.analyzed_at)
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %profile.user_id, "Failed to store resume analysis");
            ApiError::DatabaseError(e)
        })?;

        debug!(
            user_id = %profile.user_id,
            quality_score = analysis.quality_score,
            extracted = analysis.extracted_skills.len(),
            "Resume analysis refreshed"
        );

        Ok(analysis)
    }
}
