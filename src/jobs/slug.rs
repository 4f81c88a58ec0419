// src/jobs/slug.rs
//! URL slugs for postings and categories

use regex::Regex;
use sqlx::SqlitePool;
use std::future::Future;
use std::sync::OnceLock;
use tracing::warn;

use crate::common::error::is_unique_violation;
use crate::common::helpers::cached_regex;
use crate::common::ApiError;

/// Writes tried before a slug collision is reported as a conflict.
pub const SLUG_ATTEMPTS: u32 = 3;

static CLEAN_SLUG: OnceLock<Option<Regex>> = OnceLock::new();

/// Lowercase ASCII alphanumerics separated by single dashes. Anything else
/// collapses into a dash; an empty result becomes `job`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "job".to_string()
    } else {
        slug
    }
}

pub fn is_clean_slug(slug: &str) -> bool {
    cached_regex(&CLEAN_SLUG, r"^[a-z0-9]+(?:-[a-z0-9]+)*$").is_some_and(|re| re.is_match(slug))
}

/// Appends `-1`, `-2`, ... to `base` until no other job uses it.
pub async fn unique_job_slug(
    db: &SqlitePool,
    base: &str,
    exclude_job_id: Option<&str>,
) -> Result<String, sqlx::Error> {
    let mut candidate = base.to_string();
    let mut suffix = 1;

    loop {
        let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE slug = ? AND id != ?")
            .bind(&candidate)
            .bind(exclude_job_id.unwrap_or(""))
            .fetch_one(db)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
}

/// Picks a free slug from `base` and hands it to `write`. When another
/// writer claims the same slug in between, a fresh one is picked and the
/// write retried, up to `SLUG_ATTEMPTS` times. Returns the slug stored.
pub async fn write_with_unique_slug<F, Fut>(
    db: &SqlitePool,
    base: &str,
    exclude_job_id: Option<&str>,
    mut write: F,
) -> Result<String, ApiError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    let mut attempt = 1;
    loop {
        let slug = unique_job_slug(db, base, exclude_job_id).await?;
        match write(slug.clone()).await {
            Ok(()) => return Ok(slug),
            Err(e) if is_unique_violation(&e) && attempt < SLUG_ATTEMPTS => {
                warn!(slug = %slug, attempt, "Slug taken by a concurrent write; retrying");
                attempt += 1;
            }
            Err(e) => {
                return Err(ApiError::conflict_on_unique(
                    e,
                    "A job with this slug was just created; please retry",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Backend Engineer-Acme"), "backend-engineer-acme");
        assert_eq!(slugify("  C++ / Rust Dev__(Remote)  "), "c-rust-dev-remote");
        assert_eq!(slugify("Ünïcödé"), "n-c-d");
        assert_eq!(slugify("!!!"), "job");
        assert_eq!(slugify(""), "job");
    }

    #[test]
    fn test_is_clean_slug() {
        assert!(is_clean_slug("backend-engineer-acme"));
        assert!(is_clean_slug("job-2"));
        assert!(!is_clean_slug("Backend Engineer"));
        assert!(!is_clean_slug("a/b"));
        assert!(!is_clean_slug("trailing-"));
        assert!(!is_clean_slug("double--dash"));
        assert!(!is_clean_slug(""));
    }

    #[tokio::test]
    async fn test_unique_job_slug_appends_counter() {
        let pool = crate::common::test_support::test_pool().await;
        let fixture = crate::common::test_support::Fixture::new(&pool).await;

        let slug = unique_job_slug(&pool, "backend-engineer-acme", None).await.unwrap();
        assert_eq!(slug, "backend-engineer-acme-1");

        let own = unique_job_slug(&pool, "backend-engineer-acme", Some(&fixture.job_id))
            .await
            .unwrap();
        assert_eq!(own, "backend-engineer-acme");

        let fresh = unique_job_slug(&pool, "frontend-engineer-acme", None).await.unwrap();
        assert_eq!(fresh, "frontend-engineer-acme");
    }

    async fn insert_with_slug(pool: &SqlitePool, id: &str, slug: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO jobs (id, title, slug, company_id, description, requirements, responsibilities, \
             employment_type, experience_level, location, created_at, updated_at) \
             VALUES (?, 'Frontend Engineer', ?, 'C_ACME01', 'd', 'r', 'x', 'full_time', 'mid', 'Berlin', \
             '2024-03-01T00:00:00Z', '2024-03-01T00:00:00Z')",
        )
        .bind(id)
        .bind(slug)
        .execute(pool)
        .await
        .map(|_| ())
    }

    #[tokio::test]
    async fn test_write_retries_when_slug_is_claimed_concurrently() {
        let pool = crate::common::test_support::test_pool().await;
        crate::common::test_support::Fixture::new(&pool).await;
        let calls = AtomicU32::new(0);
        let (db, counter) = (&pool, &calls);

        let stored = write_with_unique_slug(&pool, "frontend-engineer-acme", None, move |slug| async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                // a competing request lands first with the same slug
                insert_with_slug(db, "J_RIVAL1", &slug).await?;
            }
            insert_with_slug(db, "J_MINE01", &slug).await
        })
        .await
        .unwrap();

        assert_eq!(stored, "frontend-engineer-acme-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_write_gives_up_with_conflict() {
        let pool = crate::common::test_support::test_pool().await;
        let fixture = crate::common::test_support::Fixture::new(&pool).await;

        let (db, taken) = (&pool, fixture.job_slug.as_str());

        let result = write_with_unique_slug(&pool, "backend-engineer-acme", None, move |_| async move {
            insert_with_slug(db, "J_MINE01", taken).await
        })
        .await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }
}
