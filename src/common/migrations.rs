// src/common/migrations.rs
//! Database schema management
//!
//! Every statement is `IF NOT EXISTS`, so running this on each startup is
//! safe. `RESET_DB=true` drops everything first.

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    }

    create_account_tables(pool).await?;
    create_company_tables(pool).await?;
    create_job_tables(pool).await?;
    create_application_tables(pool).await?;
    create_engagement_tables(pool).await?;
    create_system_tables(pool).await?;
    create_indexes(pool).await?;

    init_default_settings(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

/// Seeds runtime settings from the environment without overwriting values an
/// admin has already changed.
async fn init_default_settings(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let env_settings = [
        ("openai_api_key", "OPENAI_API_KEY"),
        ("openai_base_url", "OPENAI_BASE_URL"),
        ("openai_model", "OPENAI_MODEL"),
        ("matcher_backend", "MATCHER_BACKEND"),
        ("assistant_ai_enabled", "ASSISTANT_AI_ENABLED"),
    ];

    for (db_key, env_key) in env_settings {
        let Ok(value) = env::var(env_key) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO system_settings (key, value, encrypted, updated_at, updated_by)
            VALUES (?, ?, 0, datetime('now'), 'system')
            "#,
        )
        .bind(db_key)
        .bind(&value)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            info!(key = %db_key, "Initialized setting from environment variable");
        }
    }

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Reverse dependency order
    let tables = [
        "notifications",
        "bookmarks",
        "application_status_history",
        "applications",
        "jobs",
        "job_categories",
        "companies",
        "resume_analyses",
        "seeker_profiles",
        "system_settings",
        "users",
    ];

    for table in tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_account_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL CHECK(role IN ('seeker', 'company')),
            date_of_birth TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS seeker_profiles (
            user_id TEXT PRIMARY KEY,
            first_name TEXT,
            last_name TEXT,
            phone TEXT,
            email TEXT,
            skills TEXT,
            date_of_birth TEXT,
            profile_picture TEXT,
            resume_file TEXT,
            resume_text TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resume_analyses (
            user_id TEXT PRIMARY KEY,
            extracted_skills TEXT NOT NULL DEFAULT '[]',
            inferred_skills TEXT NOT NULL DEFAULT '[]',
            quality_score INTEGER NOT NULL DEFAULT 0,
            ats_report TEXT NOT NULL DEFAULT '{}',
            analyzed_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_company_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id TEXT PRIMARY KEY,
            owner_id TEXT UNIQUE NOT NULL,
            name TEXT UNIQUE NOT NULL,
            description TEXT,
            website TEXT,
            location TEXT,
            logo TEXT,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK(status IN ('pending', 'approved', 'rejected')),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(owner_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_job_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS job_categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            company_id TEXT NOT NULL,
            category_id TEXT,
            description TEXT NOT NULL,
            requirements TEXT NOT NULL,
            responsibilities TEXT NOT NULL,
            salary_min INTEGER,
            salary_max INTEGER,
            employment_type TEXT NOT NULL
                CHECK(employment_type IN ('full_time', 'part_time', 'contract', 'internship', 'freelance')),
            experience_level TEXT NOT NULL
                CHECK(experience_level IN ('entry', 'mid', 'senior', 'executive')),
            location TEXT NOT NULL,
            remote_available INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            application_deadline TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(company_id) REFERENCES companies(id) ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES job_categories(id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_application_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS applications (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            job_id TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'submitted'
                CHECK(status IN ('submitted', 'reviewed', 'accepted', 'rejected', 'withdrawn')),
            cover_letter TEXT,
            match_score INTEGER,
            applied_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, job_id),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY(job_id) REFERENCES jobs(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS application_status_history (
            id TEXT PRIMARY KEY,
            application_id TEXT NOT NULL,
            status TEXT NOT NULL,
            changed_by TEXT NOT NULL,
            notes TEXT,
            changed_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(application_id) REFERENCES applications(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_engagement_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookmarks (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            job_id TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, job_id),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY(job_id) REFERENCES jobs(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            link TEXT,
            is_read INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_system_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS system_settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            encrypted INTEGER DEFAULT 0,
            description TEXT,
            updated_at TEXT DEFAULT (datetime('now')),
            updated_by TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_companies_status ON companies(status)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_company_id ON jobs(company_id)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_category_id ON jobs(category_id)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_active_created ON jobs(is_active, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_applications_job_id ON applications(job_id)",
        "CREATE INDEX IF NOT EXISTS idx_applications_user_id ON applications(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_status_history_application ON application_status_history(application_id, changed_at)",
        "CREATE INDEX IF NOT EXISTS idx_bookmarks_user ON bookmarks(user_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, is_read, created_at)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        for expected in ["applications", "bookmarks", "companies", "jobs", "notifications", "users"] {
            assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_duplicate_application_is_rejected_by_schema() {
        let pool = crate::common::test_support::test_pool().await;
        let fixture = crate::common::test_support::Fixture::new(&pool).await;

        let insert = "INSERT INTO applications (id, user_id, job_id) VALUES (?, ?, ?)";
        sqlx::query(insert)
            .bind("A_000001")
            .bind(&fixture.seeker_id)
            .bind(&fixture.job_id)
            .execute(&pool)
            .await
            .unwrap();
        let second = sqlx::query(insert)
            .bind("A_000002")
            .bind(&fixture.seeker_id)
            .bind(&fixture.job_id)
            .execute(&pool)
            .await;

        assert!(crate::common::error::is_unique_violation(&second.unwrap_err()));
    }
}
