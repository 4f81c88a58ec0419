// src/jobs/services/listings.rs

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::common::{generate_id, now_timestamp, ApiError, EntityPrefix, Page, Pagination, Validator};
use crate::companies::Company;
use crate::jobs::models::*;
use crate::jobs::slug::{is_clean_slug, slugify, unique_job_slug, write_with_unique_slug};
use crate::jobs::validators::{check_salary_range, JobValidator};

/// Every read goes through this projection so `Job` rows always carry their
/// company and category.
pub const JOB_SELECT: &str = r#"
    SELECT j.id, j.title, j.slug, j.company_id,
           c.name AS company_name, c.logo AS company_logo,
           j.category_id, g.name AS category_name, g.slug AS category_slug,
           j.description, j.requirements, j.responsibilities,
           j.salary_min, j.salary_max, j.employment_type, j.experience_level,
           j.location, j.remote_available, j.is_active, j.application_deadline,
           j.created_at, j.updated_at
    FROM jobs j
    JOIN companies c ON c.id = j.company_id
    LEFT JOIN job_categories g ON g.id = j.category_id
"#;

const RELATED_LIMIT: i64 = 5;

pub struct JobsService {
    db: SqlitePool,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Job not found".to_string())
}

fn trimmed_or_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `%value%` for a `LIKE ... ESCAPE '\'` clause, with the value's own
/// wildcards matched literally.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl JobsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub async fn get_job(&self, job_id: &str) -> Result<Job, ApiError> {
        sqlx::query_as::<_, Job>(&format!("{} WHERE j.id = ?", JOB_SELECT))
            .bind(job_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(not_found)
    }

    /// A job the public may see: active, and posted by an approved company.
    pub async fn get_visible_job(&self, job_id: &str) -> Result<Job, ApiError> {
        sqlx::query_as::<_, Job>(&format!(
            "{} WHERE j.id = ? AND j.is_active = 1 AND c.status = 'approved'",
            JOB_SELECT
        ))
        .bind(job_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(not_found)
    }

    pub async fn get_visible_by_slug(&self, slug: &str) -> Result<Job, ApiError> {
        sqlx::query_as::<_, Job>(&format!(
            "{} WHERE j.slug = ? AND j.is_active = 1 AND c.status = 'approved'",
            JOB_SELECT
        ))
        .bind(slug)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(not_found)
    }

    /// Visible postings still open for applications, newest first.
    pub async fn list_open_jobs(&self, limit: i64) -> Result<Vec<Job>, ApiError> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "{} WHERE j.is_active = 1 AND c.status = 'approved' ORDER BY j.created_at DESC, j.id DESC LIMIT ?",
            JOB_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(jobs.into_iter().filter(|job| !job.is_expired()).collect())
    }

    /// Up to five other visible jobs in the same category, newest first.
    pub async fn related_jobs(&self, job: &Job) -> Result<Vec<JobView>, ApiError> {
        let Some(category_id) = &job.category_id else {
            return Ok(Vec::new());
        };

        let jobs = sqlx::query_as::<_, Job>(&format!(
            "{} WHERE j.category_id = ? AND j.id != ? AND j.is_active = 1 AND c.status = 'approved' \
             ORDER BY j.created_at DESC, j.id DESC LIMIT ?",
            JOB_SELECT
        ))
        .bind(category_id)
        .bind(&job.id)
        .bind(RELATED_LIMIT)
        .fetch_all(&self.db)
        .await?;

        Ok(jobs.into_iter().map(JobView::from).collect())
    }

    /// `(is_bookmarked, has_applied)` for one viewer. Withdrawn applications
    /// do not count as applied.
    pub async fn viewer_flags(&self, user_id: &str, job_id: &str) -> Result<(bool, bool), ApiError> {
        let bookmarked: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM bookmarks WHERE user_id = ? AND job_id = ?")
                .bind(user_id)
                .bind(job_id)
                .fetch_one(&self.db)
                .await?;
        let applied: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications WHERE user_id = ? AND job_id = ? AND status != 'withdrawn'",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.db)
        .await?;
        Ok((bookmarked > 0, applied > 0))
    }

    // ========================================================================
    // Public listing
    // ========================================================================

    pub async fn list_public(&self, params: &JobQueryParams) -> Result<Page<JobView>, ApiError> {
        let pagination = Pagination::from_query(params.page, params.page_size);

        let mut conditions: Vec<&str> = vec!["j.is_active = 1", "c.status = 'approved'"];
        let mut binds: Vec<String> = Vec::new();

        if let Some(search) = trimmed_or_none(params.search.clone()) {
            conditions.push(
                r"(LOWER(j.title) LIKE ? ESCAPE '\' OR LOWER(c.name) LIKE ? ESCAPE '\' OR LOWER(j.description) LIKE ? ESCAPE '\')",
            );
            let pattern = contains_pattern(&search);
            binds.extend([pattern.clone(), pattern.clone(), pattern]);
        }
        if let Some(category) = trimmed_or_none(params.category.clone()) {
            conditions.push("g.slug = ?");
            binds.push(category);
        }
        if let Some(employment_type) = trimmed_or_none(params.employment_type.clone()) {
            conditions.push("j.employment_type = ?");
            binds.push(employment_type);
        }
        if let Some(location) = trimmed_or_none(params.location.clone()) {
            conditions.push(r"LOWER(j.location) LIKE ? ESCAPE '\'");
            binds.push(contains_pattern(&location));
        }
        if params.remote_only() {
            conditions.push("j.remote_available = 1");
        }

        let where_clause = conditions.join(" AND ");

        let count_sql = format!(
            "SELECT COUNT(*) FROM jobs j JOIN companies c ON c.id = j.company_id \
             LEFT JOIN job_categories g ON g.id = j.category_id WHERE {}",
            where_clause
        );
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(&self.db).await?;

        let list_sql = format!(
            "{} WHERE {} ORDER BY j.created_at DESC, j.id DESC LIMIT ? OFFSET ?",
            JOB_SELECT, where_clause
        );
        let mut list_query = sqlx::query_as::<_, Job>(&list_sql);
        for bind in &binds {
            list_query = list_query.bind(bind);
        }
        let jobs = list_query
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.db)
            .await?;

        Ok(Page::new(
            jobs.into_iter().map(JobView::from).collect(),
            total,
            pagination,
        ))
    }

    /// All of a company's postings, active or not.
    pub async fn list_company_jobs(
        &self,
        company_id: &str,
        pagination: Pagination,
    ) -> Result<Page<JobView>, ApiError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE company_id = ?")
            .bind(company_id)
            .fetch_one(&self.db)
            .await?;

        let jobs = sqlx::query_as::<_, Job>(&format!(
            "{} WHERE j.company_id = ? ORDER BY j.created_at DESC, j.id DESC LIMIT ? OFFSET ?",
            JOB_SELECT
        ))
        .bind(company_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(Page::new(
            jobs.into_iter().map(JobView::from).collect(),
            total,
            pagination,
        ))
    }

    // ========================================================================
    // Company writes
    // ========================================================================

    async fn ensure_category_exists(&self, category_id: &Option<String>) -> Result<(), ApiError> {
        if let Some(category_id) = category_id {
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_categories WHERE id = ?")
                .bind(category_id)
                .fetch_one(&self.db)
                .await?;
            if exists == 0 {
                return Err(ApiError::BadRequest("Unknown category".to_string()));
            }
        }
        Ok(())
    }

    async fn owned_job(&self, company: &Company, job_id: &str) -> Result<Job, ApiError> {
        let job = self.get_job(job_id).await?;
        if job.company_id != company.id {
            return Err(ApiError::Forbidden(
                "You are not allowed to edit this job.".to_string(),
            ));
        }
        Ok(job)
    }

    pub async fn create_job(&self, company: &Company, request: CreateJobRequest) -> Result<Job, ApiError> {
        JobValidator.validate(&request).into_result()?;
        let category_id = trimmed_or_none(request.category_id.clone());
        self.ensure_category_exists(&category_id).await?;

        let title = request.title.trim().to_string();
        let deadline = trimmed_or_none(request.application_deadline.clone());
        let job_id = generate_id(EntityPrefix::Job);
        let now = now_timestamp();

        let (db, request) = (&self.db, &request);
        let (id, title_ref, now_ref) = (job_id.as_str(), title.as_str(), now.as_str());
        let (category, deadline_ref) = (category_id.as_deref(), deadline.as_deref());
        let base = slugify(&format!("{}-{}", title, company.name));

        let slug = write_with_unique_slug(db, &base, None, move |slug| async move {
            sqlx::query(
                r#"
                INSERT INTO jobs (id, title, slug, company_id, category_id, description, requirements,
                                  responsibilities, salary_min, salary_max, employment_type, experience_level,
                                  location, remote_available, is_active, application_deadline, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(title_ref)
            .bind(slug)
            .bind(&company.id)
            .bind(category)
            .bind(request.description.trim())
            .bind(request.requirements.trim())
            .bind(request.responsibilities.trim())
            .bind(request.salary_min)
            .bind(request.salary_max)
            .bind(&request.employment_type)
            .bind(&request.experience_level)
            .bind(request.location.trim())
            .bind(request.remote_available)
            .bind(deadline_ref)
            .bind(now_ref)
            .bind(now_ref)
            .execute(db)
            .await
            .map(|_| ())
        })
        .await?;

        info!(job_id = %job_id, company_id = %company.id, slug = %slug, "Job posted");

        self.get_job(&job_id).await
    }

    /// Partial update. A new title yields a new slug.
    pub async fn update_job(
        &self,
        company: &Company,
        job_id: &str,
        request: UpdateJobRequest,
    ) -> Result<Job, ApiError> {
        let job = self.owned_job(company, job_id).await?;
        JobValidator.validate(&request).into_result()?;

        let salary_min = request.salary_min.or(job.salary_min);
        let salary_max = request.salary_max.or(job.salary_max);
        let mut salary_check = crate::common::ValidationResult::new();
        check_salary_range(&mut salary_check, salary_min, salary_max);
        salary_check.into_result()?;

        let category_id = match request.category_id {
            Some(value) => trimmed_or_none(Some(value)),
            None => job.category_id.clone(),
        };
        self.ensure_category_exists(&category_id).await?;

        let title = request
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| job.title.clone());
        let slug = if title != job.title {
            unique_job_slug(
                &self.db,
                &slugify(&format!("{}-{}", title, company.name)),
                Some(&job.id),
            )
            .await?
        } else {
            job.slug.clone()
        };

        let deadline = match request.application_deadline {
            Some(value) => trimmed_or_none(Some(value)),
            None => job.application_deadline.clone(),
        };

        sqlx::query(
            r#"
            UPDATE jobs SET title = ?, slug = ?, category_id = ?, description = ?, requirements = ?,
                            responsibilities = ?, salary_min = ?, salary_max = ?, employment_type = ?,
                            experience_level = ?, location = ?, remote_available = ?,
                            application_deadline = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&title)
        .bind(&slug)
        .bind(&category_id)
        .bind(request.description.map(|v| v.trim().to_string()).unwrap_or(job.description))
        .bind(request.requirements.map(|v| v.trim().to_string()).unwrap_or(job.requirements))
        .bind(
            request
                .responsibilities
                .map(|v| v.trim().to_string())
                .unwrap_or(job.responsibilities),
        )
        .bind(salary_min)
        .bind(salary_max)
        .bind(request.employment_type.unwrap_or(job.employment_type))
        .bind(request.experience_level.unwrap_or(job.experience_level))
        .bind(request.location.map(|v| v.trim().to_string()).unwrap_or(job.location))
        .bind(request.remote_available.unwrap_or(job.remote_available))
        .bind(&deadline)
        .bind(now_timestamp())
        .bind(&job.id)
        .execute(&self.db)
        .await
        .map_err(|e| ApiError::conflict_on_unique(e, "A job with this slug was just created; please retry"))?;

        info!(job_id = %job.id, slug = %slug, "Job updated");

        self.get_job(&job.id).await
    }

    pub async fn set_active(&self, company: &Company, job_id: &str, active: bool) -> Result<Job, ApiError> {
        let job = self.owned_job(company, job_id).await?;

        sqlx::query("UPDATE jobs SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(now_timestamp())
            .bind(&job.id)
            .execute(&self.db)
            .await?;

        info!(job_id = %job.id, active = active, "Job visibility changed");
        self.get_job(&job.id).await
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Rewrites malformed slugs (slashes, whitespace, stray characters) into
    /// unique clean ones. Returns how many rows changed.
    pub async fn fix_slugs(&self) -> Result<u64, ApiError> {
        let rows: Vec<(String, String, String, String)> = sqlx::query_as(
            "SELECT j.id, j.slug, j.title, c.name FROM jobs j JOIN companies c ON c.id = j.company_id ORDER BY j.created_at ASC",
        )
        .fetch_all(&self.db)
        .await?;

        let mut fixed = 0;
        for (job_id, slug, title, company_name) in rows {
            if is_clean_slug(&slug) {
                continue;
            }

            let mut base = slugify(&slug);
            if base == "job" {
                base = slugify(&format!("{}-{}", title, company_name));
            }
            let new_slug = unique_job_slug(&self.db, &base, Some(&job_id)).await?;

            sqlx::query("UPDATE jobs SET slug = ?, updated_at = ? WHERE id = ?")
                .bind(&new_slug)
                .bind(now_timestamp())
                .bind(&job_id)
                .execute(&self.db)
                .await?;

            warn!(job_id = %job_id, old_slug = %slug, new_slug = %new_slug, "Rewrote malformed job slug");
            fixed += 1;
        }

        Ok(fixed)
    }
}
