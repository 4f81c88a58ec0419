// src/common/test_support.rs
//! Shared fixtures for unit and router tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

use super::dev_mode::DevModeConfig;
use super::id_generator::generate_raw_id;
use super::migrations::run_migrations;
use super::AppState;
use crate::matching::KeywordMatcher;
use crate::services::{OpenAIService, RateLimitService, SettingsService};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// In-memory databases are per connection, so the pool is pinned to one.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");
    pool
}

fn scratch_dir(kind: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jobsite-test-{}-{}", kind, generate_raw_id(8)));
    std::fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

pub fn test_state(pool: SqlitePool) -> Arc<RwLock<AppState>> {
    let settings_service = Arc::new(SettingsService::with_encryption(pool.clone(), None));
    let openai_service = Arc::new(OpenAIService::new(settings_service.clone()));
    let rate_limit_service = Arc::new(RateLimitService::new(settings_service.clone()));

    Arc::new(RwLock::new(AppState {
        db: pool,
        resumes_dir: scratch_dir("resumes"),
        pictures_dir: scratch_dir("pictures"),
        logos_dir: scratch_dir("logos"),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_ttl_hours: 24,
        admin_emails: HashSet::from([ADMIN_EMAIL.to_string()]),
        dev_mode: DevModeConfig::default(),
        settings_service,
        openai_service,
        rate_limit_service,
        matcher: Arc::new(KeywordMatcher),
    }))
}

pub fn test_app(state: Arc<RwLock<AppState>>) -> Router {
    crate::app_router(state)
}

pub fn token_for(user_id: &str) -> String {
    crate::auth::handlers::create_jwt(user_id, TEST_JWT_SECRET, 24).expect("jwt")
}

pub async fn insert_user(pool: &SqlitePool, id: &str, username: &str, email: &str, role: &str) {
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role, created_at) VALUES (?, ?, ?, 'unused', ?, '2024-01-01T00:00:00Z')",
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(role)
    .execute(pool)
    .await
    .expect("insert user");

    if role == "seeker" {
        sqlx::query(
            "INSERT INTO seeker_profiles (user_id, email, created_at, updated_at) VALUES (?, ?, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .bind(id)
        .bind(email)
        .execute(pool)
        .await
        .expect("insert profile");
    }
}

/// Inserts an active job for `company_id` and returns its id.
pub async fn insert_job(
    pool: &SqlitePool,
    id: &str,
    company_id: &str,
    title: &str,
    slug: &str,
    created_at: &str,
) -> String {
    sqlx::query(
        r#"
        INSERT INTO jobs (id, title, slug, company_id, category_id, description, requirements, responsibilities,
                          salary_min, salary_max, employment_type, experience_level, location,
                          remote_available, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, NULL, ?, ?, ?, 50000, 90000, 'full_time', 'mid', 'Berlin', 0, 1, ?, ?)
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(slug)
    .bind(company_id)
    .bind(format!("{} building services in Python and Django", title))
    .bind("Python, Django, SQL, Docker")
    .bind("Design REST APIs and review code")
    .bind(created_at)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("insert job");
    id.to_string()
}

/// A small populated world: two seekers, one approved company with an
/// active job, a category and an admin account.
pub struct Fixture {
    pub seeker_id: String,
    pub other_seeker_id: String,
    pub company_user_id: String,
    pub company_id: String,
    pub category_id: String,
    pub job_id: String,
    pub job_slug: String,
    pub admin_id: String,
}

impl Fixture {
    pub async fn new(pool: &SqlitePool) -> Self {
        insert_user(pool, "U_SEEK01", "alice", "alice@example.com", "seeker").await;
        insert_user(pool, "U_SEEK02", "bob", "bob@example.com", "seeker").await;
        insert_user(pool, "U_COMP01", "acme_hr", "hr@acme.test", "company").await;
        insert_user(pool, "U_ADMIN1", "root", ADMIN_EMAIL, "seeker").await;

        sqlx::query(
            "UPDATE seeker_profiles SET first_name = 'Alice', last_name = 'Smith', phone = '+1 555 0100', skills = 'Python, Django, SQL', resume_text = ? WHERE user_id = 'U_SEEK01'",
        )
        .bind("Alice Smith\nalice@example.com\nExperience\nBuilt Django services in Python with PostgreSQL and SQL reporting.\nEducation\nBSc Computer Science\nSkills\nPython, Django, SQL")
        .execute(pool)
        .await
        .expect("seed profile");

        sqlx::query(
            "INSERT INTO companies (id, owner_id, name, description, location, status, created_at, updated_at) VALUES ('C_ACME01', 'U_COMP01', 'Acme', 'Widgets', 'Berlin', 'approved', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(pool)
        .await
        .expect("insert company");

        sqlx::query("INSERT INTO job_categories (id, name, slug) VALUES ('G_ENG001', 'Engineering', 'engineering')")
            .execute(pool)
            .await
            .expect("insert category");

        let job_id = insert_job(
            pool,
            "J_BACK01",
            "C_ACME01",
            "Backend Engineer",
            "backend-engineer-acme",
            "2024-01-01T08:00:00Z",
        )
        .await;
        sqlx::query("UPDATE jobs SET category_id = 'G_ENG001' WHERE id = ?")
            .bind(&job_id)
            .execute(pool)
            .await
            .expect("categorise job");

        Self {
            seeker_id: "U_SEEK01".to_string(),
            other_seeker_id: "U_SEEK02".to_string(),
            company_user_id: "U_COMP01".to_string(),
            company_id: "C_ACME01".to_string(),
            category_id: "G_ENG001".to_string(),
            job_id,
            job_slug: "backend-engineer-acme".to_string(),
            admin_id: "U_ADMIN1".to_string(),
        }
    }
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

/// Sends one request and decodes the JSON body (`Value::Null` when empty or not JSON).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Builds a multipart body with a single file field.
pub fn multipart_request(
    uri: &str,
    token: &str,
    field: &str,
    filename: &str,
    data: &[u8],
) -> Request<Body> {
    let boundary = "jobsite-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"{n}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            b = boundary,
            f = field,
            n = filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("request")
}
