// src/matching/advice.rs
//! Career advice, profile insights and experience-level inference

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::common::helpers::cached_regex;
use crate::profile::models::SeekerProfile;

const HIGH_DEMAND_SKILLS: [&str; 11] = [
    "Python", "JavaScript", "React", "AWS", "Docker", "Kubernetes",
    "Machine Learning", "Data Science", "SQL", "Git", "Agile",
];

static YEARS_RE: OnceLock<Option<Regex>> = OnceLock::new();

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CareerAdvice {
    pub recommendations: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub next_steps: Vec<String>,
    pub market_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileInsights {
    pub profile_completeness: u8,
    pub strengths: Vec<String>,
    pub recommendations: Vec<String>,
    pub market_position: &'static str,
    pub growth_potential: &'static str,
}

pub fn generate_career_advice(skills: &[String], experience_years: u32) -> CareerAdvice {
    let mut advice = CareerAdvice::default();
    let user_skills: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();

    let missing: Vec<String> = HIGH_DEMAND_SKILLS
        .iter()
        .filter(|skill| {
            let skill = skill.to_lowercase();
            !user_skills.iter().any(|user_skill| user_skill.contains(&skill))
        })
        .map(|s| s.to_string())
        .collect();

    if !missing.is_empty() {
        advice.skill_gaps = missing.iter().take(5).cloned().collect();
        let top: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();
        advice
            .recommendations
            .push(format!("Consider learning: {}", top.join(", ")));
    }

    let (steps, recommendation) = match experience_years {
        0..=1 => (
            [
                "Focus on building a strong portfolio with personal projects",
                "Consider contributing to open source projects",
            ],
            "Apply for internships or entry-level positions",
        ),
        2..=4 => (
            [
                "Consider specializing in a specific technology stack",
                "Start mentoring junior developers",
            ],
            "Look for mid-level positions with growth opportunities",
        ),
        _ => (
            [
                "Consider leadership or senior technical roles",
                "Share your expertise through speaking or writing",
            ],
            "Look for senior or lead positions",
        ),
    };
    advice.next_steps = steps.iter().map(|s| s.to_string()).collect();
    advice.recommendations.push(recommendation.to_string());

    let has = |name: &str| user_skills.iter().any(|s| s == name);
    if has("python") {
        advice
            .market_insights
            .push("Python developers are in high demand, especially in data science and AI".to_string());
    }
    if has("react") {
        advice
            .market_insights
            .push("React skills are highly valued in frontend development".to_string());
    }
    if has("aws") {
        advice
            .market_insights
            .push("Cloud skills (AWS) are increasingly important".to_string());
    }

    advice
}

/// Weighted presence of skills, resume, picture, phone, email and full name.
pub fn profile_completeness(profile: &SeekerProfile) -> u8 {
    [
        (profile.has_skills(), 25),
        (profile.has_resume(), 25),
        (profile.has_picture(), 10),
        (profile.has_phone(), 10),
        (profile.has_email(), 10),
        (profile.has_full_name(), 20),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, weight)| weight)
    .sum()
}

pub fn missing_profile_fields(profile: &SeekerProfile) -> Vec<&'static str> {
    [
        (profile.has_skills(), "skills"),
        (profile.has_resume(), "resume"),
        (profile.has_picture(), "profile_picture"),
        (profile.has_phone(), "phone"),
        (profile.has_email(), "email"),
        (profile.has_full_name(), "full_name"),
    ]
    .into_iter()
    .filter(|(present, _)| !present)
    .map(|(_, field)| field)
    .collect()
}

pub fn generate_profile_insights(profile: &SeekerProfile) -> ProfileInsights {
    let completeness = profile_completeness(profile);
    let mut strengths = Vec::new();
    let mut recommendations = Vec::new();

    let market_position = if completeness >= 80 {
        strengths.push("Complete and professional profile".to_string());
        "senior"
    } else if completeness >= 60 {
        strengths.push("Good profile foundation".to_string());
        "mid"
    } else {
        recommendations.push("Complete your profile to improve visibility".to_string());
        "entry"
    };

    let skill_count = profile.skills_list().len();
    let growth_potential = if skill_count >= 10 {
        strengths.push("Diverse skill set".to_string());
        "high"
    } else if skill_count >= 5 {
        strengths.push("Good skill foundation".to_string());
        "medium"
    } else {
        recommendations.push("Add more skills to your profile".to_string());
        "low"
    };

    ProfileInsights {
        profile_completeness: completeness,
        strengths,
        recommendations,
        market_position,
        growth_potential,
    }
}

/// Largest "N years" / "N+ yrs" figure mentioned, if any.
pub fn stated_experience_years(text: &str) -> Option<u32> {
    let re = cached_regex(&YEARS_RE, r"(?i)(\d+)\+?\s*(?:years?|yrs?)\b")?;
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
}

pub fn experience_level(years: Option<u32>) -> &'static str {
    match years {
        Some(y) if y >= 5 => "senior",
        Some(y) if y >= 2 => "mid",
        _ => "entry",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_career_advice_gaps_and_insights() {
        let advice = generate_career_advice(&skills(&["Python", "react", "Amazon AWS"]), 3);
        assert_eq!(
            advice.skill_gaps,
            vec!["JavaScript", "Docker", "Kubernetes", "Machine Learning", "Data Science"]
        );
        assert_eq!(
            advice.recommendations,
            vec![
                "Consider learning: JavaScript, Docker, Kubernetes",
                "Look for mid-level positions with growth opportunities"
            ]
        );
        assert_eq!(advice.next_steps[1], "Start mentoring junior developers");
        // "amazon aws" is not exactly "aws"
        assert_eq!(advice.market_insights.len(), 2);
    }

    #[test]
    fn test_career_advice_bands() {
        assert_eq!(
            generate_career_advice(&[], 0).recommendations.last().map(String::as_str),
            Some("Apply for internships or entry-level positions")
        );
        assert_eq!(
            generate_career_advice(&[], 5).next_steps[0],
            "Consider leadership or senior technical roles"
        );
    }

    #[test]
    fn test_profile_insights() {
        let mut profile = SeekerProfile {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
            phone: Some("555".into()),
            skills: Some("a, b, c, d, e".into()),
            ..SeekerProfile::default()
        };
        let insights = generate_profile_insights(&profile);
        assert_eq!(insights.profile_completeness, 65);
        assert_eq!(insights.market_position, "mid");
        assert_eq!(insights.growth_potential, "medium");
        assert_eq!(missing_profile_fields(&profile), vec!["resume", "profile_picture"]);

        profile.resume_file = Some("R_X.pdf".into());
        assert_eq!(generate_profile_insights(&profile).market_position, "senior");

        let empty = generate_profile_insights(&SeekerProfile::default());
        assert_eq!(empty.profile_completeness, 0);
        assert_eq!(empty.growth_potential, "low");
        assert_eq!(empty.recommendations.len(), 2);
    }

    #[test]
    fn test_experience_level() {
        assert_eq!(stated_experience_years("3 years of Go, 7+ yrs of Python"), Some(7));
        assert_eq!(stated_experience_years("no numbers here"), None);
        assert_eq!(experience_level(Some(1)), "entry");
        assert_eq!(experience_level(Some(4)), "mid");
        assert_eq!(experience_level(Some(12)), "senior");
        assert_eq!(experience_level(None), "entry");
    }
}
