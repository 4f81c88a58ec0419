// src/profile/services.rs

use sqlx::SqlitePool;
use tracing::info;

use super::models::{SeekerProfile, UpdateProfileRequest};
use super::validators::ProfileValidator;
use crate::auth::AuthedUser;
use crate::common::helpers::clean_skills_csv;
use crate::common::{now_timestamp, ApiError, Validator};

const PROFILE_COLUMNS: &str = "user_id, first_name, last_name, phone, email, skills, date_of_birth, profile_picture, resume_file, resume_text, created_at, updated_at";

pub struct ProfileService {
    db: SqlitePool,
}

/// `Some("")` clears a column; `None` leaves it alone.
fn trimmed(value: &Option<String>) -> Option<Option<String>> {
    value.as_ref().map(|v| {
        let v = v.trim();
        if v.is_empty() {
            None
        } else {
            Some(v.to_string())
        }
    })
}

impl ProfileService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_profile(&self, user_id: &str) -> Result<Option<SeekerProfile>, ApiError> {
        let profile = sqlx::query_as::<_, SeekerProfile>(&format!(
            "SELECT {} FROM seeker_profiles WHERE user_id = ?",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<SeekerProfile, ApiError> {
        self.find_profile(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
    }

    /// Applies a partial update. Returns the new profile and whether the
    /// skills changed.
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<(SeekerProfile, bool), ApiError> {
        ProfileValidator.validate(&request).into_result()?;
        let current = self.get_profile(user_id).await?;

        let skills = request.skills.as_deref().map(|s| {
            let cleaned = clean_skills_csv(s);
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        });
        let skills_changed = skills.as_ref().is_some_and(|s| *s != current.skills);

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Option<String>> = Vec::new();
        for (column, value) in [
            ("first_name = ?", trimmed(&request.first_name)),
            ("last_name = ?", trimmed(&request.last_name)),
            ("phone = ?", trimmed(&request.phone)),
            ("email = ?", trimmed(&request.email).map(|e| e.map(|e| e.to_lowercase()))),
            ("skills = ?", skills),
            ("date_of_birth = ?", trimmed(&request.date_of_birth)),
        ] {
            if let Some(value) = value {
                sets.push(column);
                values.push(value);
            }
        }

        let sql = format!(
            "UPDATE seeker_profiles SET {}, updated_at = ? WHERE user_id = ?",
            sets.join(", ")
        );
        let mut query = sqlx::query(&sql);
        for value in values {
            query = query.bind(value);
        }
        query
            .bind(now_timestamp())
            .bind(user_id)
            .execute(&self.db)
            .await?;

        info!(user_id = %user_id, fields = sets.len(), skills_changed, "Profile updated");

        Ok((self.get_profile(user_id).await?, skills_changed))
    }

    /// Stores a new resume and its text. Returns the replaced file name.
    pub async fn set_resume(
        &self,
        user_id: &str,
        filename: &str,
        text: &str,
    ) -> Result<Option<String>, ApiError> {
        let previous = self.get_profile(user_id).await?.resume_file;

        sqlx::query("UPDATE seeker_profiles SET resume_file = ?, resume_text = ?, updated_at = ? WHERE user_id = ?")
            .bind(filename)
            .bind(text)
            .bind(now_timestamp())
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(previous)
    }

    pub async fn set_picture(&self, user_id: &str, filename: &str) -> Result<Option<String>, ApiError> {
        let previous = self.get_profile(user_id).await?.profile_picture;

        sqlx::query("UPDATE seeker_profiles SET profile_picture = ?, updated_at = ? WHERE user_id = ?")
            .bind(filename)
            .bind(now_timestamp())
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(previous)
    }

    /// Owner, admins, and companies holding an application from the owner.
    pub async fn can_read_resume(&self, viewer: &AuthedUser, filename: &str) -> Result<bool, ApiError> {
        let owner: Option<String> =
            sqlx::query_scalar("SELECT user_id FROM seeker_profiles WHERE resume_file = ?")
                .bind(filename)
                .fetch_optional(&self.db)
                .await?;

        let Some(owner) = owner else {
            return Ok(false);
        };
        if owner == viewer.id || viewer.is_admin {
            return Ok(true);
        }
        if !viewer.is_company() {
            return Ok(false);
        }

        let applications: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN companies c ON c.id = j.company_id
            WHERE a.user_id = ? AND c.owner_id = ?
            "#,
        )
        .bind(&owner)
        .bind(&viewer.id)
        .fetch_one(&self.db)
        .await?;

        Ok(applications > 0)
    }
}
