// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod admin;
mod alerts;
mod applications;
mod assistant;
mod auth;
mod bookmarks;
mod common;
mod companies;
mod jobs;
mod logging_middleware;
mod matching;
mod notifications;
mod profile;
mod rate_limit_middleware;
mod services;

use common::dev_mode::{apply_cli_override, print_dev_mode_status, DevModeConfig};
use common::{safe_email_log, AppState};
use rate_limit_middleware::rate_limit_middleware;
use services::{OpenAIService, RateLimitService, SettingsService};

/// Every API route with the shared state attached. Transport layers
/// (logging, rate limiting, CORS, tracing) are added in `main`.
pub fn app_router(state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        .merge(auth::auth_routes())
        .merge(companies::companies_routes())
        .merge(jobs::jobs_routes())
        .merge(profile::profile_routes())
        .merge(matching::matching_routes())
        .merge(applications::application_routes())
        .merge(bookmarks::bookmark_routes())
        .merge(notifications::notification_routes())
        .merge(alerts::alert_routes())
        .merge(assistant::assistant_routes())
        .merge(admin::admin_routes())
        .layer(Extension(state))
}

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn cors_layer() -> CorsLayer {
    let cors_origins = env_or(
        "CORS_ORIGINS",
        "http://localhost:3000,http://localhost:5173",
    );
    let origins: Vec<axum::http::HeaderValue> = cors_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::PATCH,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let database_url = env_or("DATABASE_URL", "sqlite://jobsite.db");
    let resumes_dir = PathBuf::from(env_or("RESUMES_DIR", "./uploads/resumes"));
    let pictures_dir = PathBuf::from(env_or("PICTURES_DIR", "./uploads/pictures"));
    let logos_dir = PathBuf::from(env_or("LOGOS_DIR", "./uploads/logos"));
    let jwt_secret = env_or("JWT_SECRET", "replace_with_strong_secret");
    let jwt_ttl_hours: i64 = env_parse("JWT_TTL_HOURS", 24);
    let matcher_backend = env_or("MATCHER_BACKEND", "keyword");
    let alert_interval_hours: u64 = env_parse("JOB_ALERTS_INTERVAL_HOURS", 0);
    let port: u16 = env_parse("PORT", 8080);

    let admin_emails: HashSet<String> = env_or("ADMIN_EMAILS", "")
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    let masked: Vec<String> = admin_emails.iter().map(|e| safe_email_log(e)).collect();
    info!(admins = ?masked, "Loaded admin emails");

    let dev_mode = apply_cli_override(DevModeConfig::from_env());
    print_dev_mode_status(&dev_mode);

    // ========================================================================
    // DIRECTORY AND DATABASE SETUP
    // ========================================================================

    for dir in [&resumes_dir, &pictures_dir, &logos_dir] {
        tokio::fs::create_dir_all(dir).await?;
    }

    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            if let Some(parent) = PathBuf::from(path_without_params).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_options).await?;
    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let settings_service = Arc::new(SettingsService::new(pool.clone()));
    let openai_service = Arc::new(OpenAIService::new(settings_service.clone()));
    let rate_limit_service = Arc::new(RateLimitService::new(settings_service.clone()));
    let matcher = matching::build_matcher(&matcher_backend, openai_service.clone());
    info!(backend = %matcher_backend, "Services initialized");

    let _alert_task = alerts::start_alert_task(pool.clone(), alert_interval_hours);
    let _rate_limit_cleanup =
        rate_limit_service.clone().start_cleanup_task(RATE_LIMIT_CLEANUP_INTERVAL);

    let app_state = AppState {
        db: pool,
        resumes_dir,
        pictures_dir,
        logos_dir,
        jwt_secret,
        jwt_ttl_hours,
        admin_emails,
        dev_mode,
        settings_service,
        openai_service,
        rate_limit_service: rate_limit_service.clone(),
        matcher,
    };

    let app = app_router(Arc::new(RwLock::new(app_state)))
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(rate_limit_service))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
