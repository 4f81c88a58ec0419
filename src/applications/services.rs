// src/applications/services.rs

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, warn};

use super::models::{
    Application, ApplicantRow, ApplicationDetail, ApplicationSummary, CreateApplicationRequest,
    StatusHistoryEntry,
};
use super::status::{self, Actor, ApplicationStatus, Transition, TransitionError};
use crate::auth::AuthedUser;
use crate::common::{generate_id, now_timestamp, ApiError, EntityPrefix};
use crate::jobs::{Job, JobsService};
use crate::matching::{Candidate, KeywordMatcher};
use crate::notifications::services::insert_notification;
use crate::profile::SeekerProfile;

const APPLICATION_COLUMNS: &str =
    "a.id, a.user_id, a.job_id, a.status, a.cover_letter, a.match_score, a.applied_at, a.updated_at";

const MAX_COVER_LETTER: usize = 5000;

fn summary_select() -> String {
    format!(
        r#"
        SELECT {}, j.title AS job_title, j.slug AS job_slug, c.name AS company_name
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        JOIN companies c ON c.id = j.company_id
        "#,
        APPLICATION_COLUMNS
    )
}

fn transition_error(e: TransitionError) -> ApiError {
    match e {
        TransitionError::NotPermitted(msg) => ApiError::Forbidden(msg),
        TransitionError::Invalid(msg) => ApiError::BadRequest(msg),
    }
}

pub struct ApplicationsService {
    db: SqlitePool,
}

impl ApplicationsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Applying
    // ========================================================================

    /// Submits an application, or revives a withdrawn one on the same row.
    /// The keyword match score is computed here and stored with it.
    pub async fn apply(
        &self,
        profile: &SeekerProfile,
        request: CreateApplicationRequest,
    ) -> Result<Application, ApiError> {
        let cover_letter = request
            .cover_letter
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if cover_letter.as_ref().is_some_and(|c| c.chars().count() > MAX_COVER_LETTER) {
            return Err(ApiError::ValidationError(format!(
                "cover_letter: Cover letter must be at most {} characters",
                MAX_COVER_LETTER
            )));
        }

        let job = JobsService::new(self.db.clone())
            .get_visible_job(request.job_id.trim())
            .await?;
        if !job.accepts_applications() {
            return Err(ApiError::BadRequest(
                "This job is no longer accepting applications".to_string(),
            ));
        }

        let user_id = profile.user_id.as_str();
        let match_score = i64::from(KeywordMatcher::report(&Candidate::from_profile(profile), &job).score);
        let now = now_timestamp();

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Application>(
            "SELECT id, user_id, job_id, status, cover_letter, match_score, applied_at, updated_at FROM applications WHERE user_id = ? AND job_id = ?",
        )
        .bind(user_id)
        .bind(&job.id)
        .fetch_optional(&mut *tx)
        .await?;

        let (application_id, notes) = match existing {
            Some(previous) if previous.status().is_open() => {
                return Err(ApiError::Conflict(
                    "You have already applied for this job".to_string(),
                ));
            }
            Some(previous) => {
                sqlx::query(
                    "UPDATE applications SET status = 'submitted', cover_letter = ?, match_score = ?, applied_at = ?, updated_at = ? WHERE id = ? AND status = 'withdrawn'",
                )
                .bind(cover_letter.as_deref())
                .bind(match_score)
                .bind(&now)
                .bind(&now)
                .bind(&previous.id)
                .execute(&mut *tx)
                .await?;
                (previous.id, Some("Re-applied after withdrawal"))
            }
            None => {
                let id = generate_id(EntityPrefix::Application);
                sqlx::query(
                    r#"
                    INSERT INTO applications (id, user_id, job_id, status, cover_letter, match_score, applied_at, updated_at)
                    VALUES (?, ?, ?, 'submitted', ?, ?, ?, ?)
                    "#,
                )
                .bind(&id)
                .bind(user_id)
                .bind(&job.id)
                .bind(cover_letter.as_deref())
                .bind(match_score)
                .bind(&now)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(|e| ApiError::conflict_on_unique(e, "You have already applied for this job"))?;
                (id, None)
            }
        };

        insert_history(&mut tx, &application_id, ApplicationStatus::Submitted, user_id, notes).await?;
        tx.commit().await?;

        info!(
            application_id = %application_id,
            user_id = %user_id,
            job_id = %job.id,
            match_score,
            "Application submitted"
        );

        self.get_application(&application_id).await
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn get_application(&self, application_id: &str) -> Result<Application, ApiError> {
        sqlx::query_as::<_, Application>(
            "SELECT id, user_id, job_id, status, cover_letter, match_score, applied_at, updated_at FROM applications WHERE id = ?",
        )
        .bind(application_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))
    }

    async fn get_summary(&self, application_id: &str) -> Result<ApplicationSummary, ApiError> {
        sqlx::query_as::<_, ApplicationSummary>(&format!("{} WHERE a.id = ?", summary_select()))
            .bind(application_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))
    }

    pub async fn list_for_seeker(&self, user_id: &str) -> Result<Vec<ApplicationSummary>, ApiError> {
        let applications = sqlx::query_as::<_, ApplicationSummary>(&format!(
            "{} WHERE a.user_id = ? ORDER BY a.applied_at DESC, a.id DESC",
            summary_select()
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(applications)
    }

    /// Jobs the seeker has an open application for.
    pub async fn get_applied_job_ids(&self, user_id: &str) -> Result<Vec<String>, ApiError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT job_id FROM applications WHERE user_id = ? AND status != 'withdrawn' ORDER BY applied_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(ids)
    }

    pub async fn history(&self, application_id: &str) -> Result<Vec<StatusHistoryEntry>, ApiError> {
        let entries = sqlx::query_as::<_, StatusHistoryEntry>(
            "SELECT id, application_id, status, changed_by, notes, changed_at FROM application_status_history WHERE application_id = ? ORDER BY changed_at ASC, rowid ASC",
        )
        .bind(application_id)
        .fetch_all(&self.db)
        .await?;
        Ok(entries)
    }

    /// The applicant, the owning company or an admin may read it.
    pub async fn get_detail(&self, viewer: &AuthedUser, application_id: &str) -> Result<ApplicationDetail, ApiError> {
        let summary = self.get_summary(application_id).await?;
        if self.actor_for(viewer, &summary.application).await?.is_none() {
            return Err(ApiError::Forbidden(
                "You are not allowed to view this application".to_string(),
            ));
        }

        let status_history = self.history(application_id).await?;
        Ok(ApplicationDetail {
            summary,
            status_history,
        })
    }

    // ========================================================================
    // Access
    // ========================================================================

    async fn owns_job(&self, user_id: &str, job_id: &str) -> Result<bool, ApiError> {
        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs j JOIN companies c ON c.id = j.company_id WHERE j.id = ? AND c.owner_id = ?",
        )
        .bind(job_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(owned > 0)
    }

    /// How `viewer` relates to `application`, if at all.
    async fn actor_for(&self, viewer: &AuthedUser, application: &Application) -> Result<Option<Actor>, ApiError> {
        if viewer.id == application.user_id {
            return Ok(Some(Actor::Applicant));
        }
        if viewer.is_admin || (viewer.is_company() && self.owns_job(&viewer.id, &application.job_id).await?) {
            return Ok(Some(Actor::Reviewer));
        }
        Ok(None)
    }

    // ========================================================================
    // Status changes
    // ========================================================================

    pub async fn update_status(
        &self,
        viewer: &AuthedUser,
        application_id: &str,
        requested: &str,
        notes: Option<&str>,
    ) -> Result<Application, ApiError> {
        let requested = ApplicationStatus::parse(requested)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid status '{}'", requested)))?;
        let summary = self.get_summary(application_id).await?;

        let actor = self
            .actor_for(viewer, &summary.application)
            .await?
            .ok_or_else(|| ApiError::Forbidden("You are not allowed to update this application".to_string()))?;

        match status::transition(summary.application.status(), requested, actor).map_err(transition_error)? {
            Transition::Unchanged => Ok(summary.application),
            Transition::Changed { from, to } => {
                self.apply_change(&summary, from, to, viewer, actor, notes).await?;
                self.get_application(application_id).await
            }
        }
    }

    /// `rejected -> reviewed`, by the owning company or an admin.
    pub async fn reopen(
        &self,
        viewer: &AuthedUser,
        application_id: &str,
        notes: Option<&str>,
    ) -> Result<Application, ApiError> {
        let summary = self.get_summary(application_id).await?;

        if self.actor_for(viewer, &summary.application).await? != Some(Actor::Reviewer) {
            return Err(ApiError::Forbidden(
                "Only the hiring company can reopen an application".to_string(),
            ));
        }

        let from = summary.application.status();
        let to = status::reopen(from).map_err(transition_error)?;
        self.apply_change(&summary, from, to, viewer, Actor::Reviewer, notes).await?;
        self.get_application(application_id).await
    }

    /// Status update, history row and applicant notification in one
    /// transaction. The update is conditional on the status read earlier.
    async fn apply_change(
        &self,
        summary: &ApplicationSummary,
        from: ApplicationStatus,
        to: ApplicationStatus,
        viewer: &AuthedUser,
        actor: Actor,
        notes: Option<&str>,
    ) -> Result<(), ApiError> {
        let application = &summary.application;
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());

        let mut tx = self.db.begin().await?;

        let updated = sqlx::query("UPDATE applications SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(to.as_str())
            .bind(now_timestamp())
            .bind(&application.id)
            .bind(from.as_str())
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            warn!(application_id = %application.id, "Status changed concurrently");
            return Err(ApiError::Conflict(
                "The application status was changed by someone else. Please reload.".to_string(),
            ));
        }

        insert_history(&mut tx, &application.id, to, &viewer.id, notes).await?;

        if actor == Actor::Reviewer {
            let message = format!(
                "Your application for '{}' is now '{}'.",
                summary.job_title,
                to.label()
            );
            let link = format!("/jobs/{}", summary.job_slug);
            insert_notification(
                &mut *tx,
                &application.user_id,
                "Application Status Updated",
                &message,
                Some(&link),
            )
            .await?;
        }

        tx.commit().await?;

        info!(
            application_id = %application.id,
            old_status = %from,
            new_status = %to,
            changed_by = %viewer.id,
            "Application status updated"
        );
        Ok(())
    }

    // ========================================================================
    // Company view
    // ========================================================================

    /// The job and its applicants in applied order. Only the owning company
    /// or an admin may list them.
    pub async fn list_for_job(&self, viewer: &AuthedUser, job_id: &str) -> Result<(Job, Vec<ApplicantRow>), ApiError> {
        let job = JobsService::new(self.db.clone()).get_job(job_id).await?;

        if !viewer.is_admin && !(viewer.is_company() && self.owns_job(&viewer.id, &job.id).await?) {
            return Err(ApiError::Forbidden(
                "You can only view applicants for your own jobs".to_string(),
            ));
        }

        let rows = sqlx::query_as::<_, ApplicantRow>(&format!(
            r#"
            SELECT {}, u.username, u.email AS account_email,
                   p.first_name, p.last_name, p.email AS profile_email, p.phone, p.skills,
                   p.profile_picture, p.resume_file, p.resume_text
            FROM applications a
            JOIN users u ON u.id = a.user_id
            LEFT JOIN seeker_profiles p ON p.user_id = a.user_id
            WHERE a.job_id = ?
            ORDER BY a.applied_at ASC, a.id ASC
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(&job.id)
        .fetch_all(&self.db)
        .await?;

        Ok((job, rows))
    }
}

async fn insert_history(
    tx: &mut Transaction<'_, Sqlite>,
    application_id: &str,
    status: ApplicationStatus,
    changed_by: &str,
    notes: Option<&str>,
) -> Result<(), ApiError> {
    sqlx::query(
        r#"
        INSERT INTO application_status_history (id, application_id, status, changed_by, notes, changed_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(generate_id(EntityPrefix::History))
    .bind(application_id)
    .bind(status.as_str())
    .bind(changed_by)
    .bind(notes)
    .bind(now_timestamp())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
