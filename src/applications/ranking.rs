// src/applications/ranking.rs
//! Applicant ranking for the hiring company

use std::cmp::Reverse;
use std::time::Duration;
use tracing::{info, warn};

use super::models::{ApplicantEntry, ApplicantRow, RankingBreakdown};
use crate::jobs::Job;
use crate::matching::advice::{experience_level, profile_completeness, stated_experience_years};
use crate::matching::{Candidate, Matcher};

/// Budget for scoring a whole applicant list.
pub const RANKING_TIMEOUT: Duration = Duration::from_secs(120);

pub fn unranked(rows: &[ApplicantRow]) -> Vec<ApplicantEntry> {
    rows.iter().map(|row| ApplicantEntry::new(row, None)).collect()
}

/// Scores every applicant and sorts by score, highest first. Ties keep
/// applied order.
pub async fn rank_applicants(matcher: &dyn Matcher, job: &Job, rows: &[ApplicantRow]) -> Vec<ApplicantEntry> {
    let mut entries = Vec::with_capacity(rows.len());

    for row in rows {
        let profile = row.profile();
        let report = matcher.score(&Candidate::from_profile(&profile), job).await;
        let level = experience_level(stated_experience_years(profile.resume_text()));
        let breakdown = RankingBreakdown::new(report, level, profile_completeness(&profile));
        entries.push(ApplicantEntry::new(row, Some(breakdown)));
    }

    entries.sort_by_key(|entry| Reverse(entry.ranking.as_ref().map_or(0, |r| r.score)));
    entries
}

/// Ranked list, or the unranked list in applied order when scoring does not
/// finish within `timeout`.
pub async fn rank_or_unranked(
    matcher: &dyn Matcher,
    job: &Job,
    rows: &[ApplicantRow],
    timeout: Duration,
) -> Vec<ApplicantEntry> {
    match tokio::time::timeout(timeout, rank_applicants(matcher, job, rows)).await {
        Ok(entries) => {
            info!(job_id = %job.id, applicants = entries.len(), backend = matcher.backend_name(), "Applicants ranked");
            entries
        }
        Err(_) => {
            warn!(job_id = %job.id, timeout_secs = timeout.as_secs(), "Applicant ranking timed out; returning unranked list");
            unranked(rows)
        }
    }
}
