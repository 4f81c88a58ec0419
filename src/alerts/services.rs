// src/alerts/services.rs

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, info};

use crate::common::helpers::{format_timestamp, split_skills};
use crate::common::ApiError;
use crate::notifications::NotificationService;

/// Skills that must all appear in a posting
const ALERT_SKILLS: usize = 3;
const ALERT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertRun {
    pub alerts_sent: u64,
    pub matched_jobs: u64,
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

pub fn alert_title(count: i64) -> String {
    format!("🎯 {} New Job{} Match Your Skills!", count, plural(count))
}

pub fn alert_message(count: i64, skills: &[String]) -> String {
    format!(
        "We found {} new job{} that match your skills: {}",
        count,
        plural(count),
        skills.join(", ")
    )
}

/// Visible postings created since `since` whose title, description or
/// requirements contain every one of `skills` (case-insensitive).
async fn count_matching_jobs(pool: &SqlitePool, skills: &[String], since: &str) -> Result<i64, sqlx::Error> {
    let mut sql = String::from(
        "SELECT COUNT(*) FROM jobs j JOIN companies c ON c.id = j.company_id WHERE j.is_active = 1 AND c.status = 'approved' AND j.created_at >= ?",
    );
    for _ in skills {
        sql.push_str(
            " AND (instr(lower(j.title), ?) > 0 OR instr(lower(j.description), ?) > 0 OR instr(lower(j.requirements), ?) > 0)",
        );
    }

    let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(since);
    for skill in skills {
        query = query.bind(skill).bind(skill).bind(skill);
    }
    query.fetch_one(pool).await
}

async fn alert_user(pool: &SqlitePool, user_id: &str, skills_csv: &str, since: &str) -> Result<i64, ApiError> {
    let skills: Vec<String> = split_skills(skills_csv)
        .into_iter()
        .map(|s| s.to_lowercase())
        .take(ALERT_SKILLS)
        .collect();
    if skills.is_empty() {
        return Ok(0);
    }

    let count = count_matching_jobs(pool, &skills, since).await?;
    if count > 0 {
        NotificationService::new(pool.clone())
            .notify(user_id, &alert_title(count), &alert_message(count, &skills), Some("/"))
            .await?;
    }
    Ok(count)
}

/// One alert pass as of `now`. A failure for one seeker is logged and the
/// pass continues with the next.
pub async fn send_job_alerts(pool: &SqlitePool, now: DateTime<Utc>) -> Result<AlertRun, ApiError> {
    let since = format_timestamp(now - Duration::hours(ALERT_WINDOW_HOURS));

    let seekers = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT u.id, p.skills
        FROM users u
        JOIN seeker_profiles p ON p.user_id = u.id
        WHERE u.role = 'seeker' AND p.skills IS NOT NULL AND trim(p.skills) != ''
        ORDER BY u.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut run = AlertRun::default();
    for (user_id, skills) in seekers {
        match alert_user(pool, &user_id, &skills, &since).await {
            Ok(0) => {}
            Ok(count) => {
                run.alerts_sent += 1;
                run.matched_jobs += count as u64;
            }
            Err(e) => error!(user_id = %user_id, error = %e, "Job alert failed"),
        }
    }

    info!(
        alerts_sent = run.alerts_sent,
        matched_jobs = run.matched_jobs,
        "Job alerts sent"
    );
    Ok(run)
}

/// Runs `send_job_alerts` every `interval_hours`. Zero disables the task.
pub fn start_alert_task(pool: SqlitePool, interval_hours: u64) -> Option<tokio::task::JoinHandle<()>> {
    if interval_hours == 0 {
        info!("Job alert task disabled");
        return None;
    }

    info!(interval_hours, "Starting job alert task");
    Some(tokio::spawn(async move {
        let period = std::time::Duration::from_secs(interval_hours * 3600);
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = send_job_alerts(&pool, Utc::now()).await {
                error!(error = %e, "Job alert run failed");
            }
        }
    }))
}
