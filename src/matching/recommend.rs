// src/matching/recommend.rs
//! Ranks open postings for one seeker by skill overlap and preferences

use serde::{Deserialize, Serialize};

use super::skills::extract_job_skills;
use crate::jobs::{Job, JobView};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationPreferences {
    pub location: Option<String>,
    pub min_salary: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct JobRecommendation {
    pub job: JobView,
    pub match_score: f64,
    pub skill_match: f64,
    pub matched_skills: Vec<String>,
}

const MAX_RECOMMENDATIONS: usize = 10;

/// Share of `job_skills` that overlap (by substring, either way) with
/// one of the user's skills.
pub fn skill_match_ratio(user_skills: &[String], job_skills: &[String]) -> f64 {
    if job_skills.is_empty() {
        return 0.0;
    }
    let user: Vec<String> = user_skills.iter().map(|s| s.to_lowercase()).collect();
    let matches = job_skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|job_skill| {
            user.iter()
                .any(|u| job_skill.contains(u.as_str()) || u.contains(job_skill.as_str()))
        })
        .count();
    matches as f64 / job_skills.len() as f64
}

pub fn recommend_jobs(
    user_skills: &[String],
    jobs: Vec<Job>,
    prefs: &RecommendationPreferences,
) -> Vec<JobRecommendation> {
    let location = prefs
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_lowercase);

    let mut recommendations: Vec<JobRecommendation> = jobs
        .into_iter()
        .map(|job| {
            let job_skills = extract_job_skills(&format!("{} {}", job.description, job.requirements));
            let skill_match = skill_match_ratio(user_skills, &job_skills);

            let mut score = skill_match;
            if location
                .as_deref()
                .is_some_and(|l| job.location.to_lowercase().contains(l))
            {
                score *= 1.2;
            }
            if prefs
                .min_salary
                .is_some_and(|min| job.salary_min.unwrap_or(0) >= min)
            {
                score *= 1.1;
            }

            let joined = job_skills.join(" ").to_lowercase();
            let matched_skills = user_skills
                .iter()
                .filter(|s| joined.contains(&s.to_lowercase()))
                .cloned()
                .collect();

            JobRecommendation {
                job: JobView::from(job),
                match_score: score.min(1.0),
                skill_match,
                matched_skills,
            }
        })
        .collect();

    recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}
