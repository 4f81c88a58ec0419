// src/matching/quality.rs
//! Resume writing checks: phrasing suggestions, ATS heuristics and the
//! 0-100 quality score.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::common::helpers::cached_regex;

const GENERIC_PHRASES: [&str; 4] = ["responsible for", "worked on", "team player", "duties included"];
const ACTION_VERBS: [&str; 6] = ["built", "developed", "designed", "led", "optimized", "implemented"];
const STANDARD_SECTIONS: [&str; 4] = ["education", "experience", "skills", "projects"];

const EXPERIENCE_KEYWORDS: [&str; 7] = ["experience", "worked", "developed", "managed", "led", "created", "implemented"];
const EDUCATION_KEYWORDS: [&str; 7] = ["education", "degree", "university", "college", "bachelor", "master", "phd"];
const ACHIEVEMENT_KEYWORDS: [&str; 7] = ["achieved", "increased", "improved", "developed", "managed", "led", "created"];

static PASSIVE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static ATS_EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static ATS_PHONE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static PHONE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static PROFILE_LINK_RE: OnceLock<Option<Regex>> = OnceLock::new();
static SKILLS_SECTION_RE: OnceLock<Option<Regex>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingSuggestion {
    pub message: String,
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    pub has_contact_info: bool,
    pub uses_standard_sections: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityAnalysis {
    pub score: u8,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, text: &str) -> bool {
    cached_regex(cell, pattern).is_some_and(|re| re.is_match(text))
}

pub fn resume_quality(text: &str) -> Vec<WritingSuggestion> {
    let lowered = text.to_lowercase();
    let mut suggestions = Vec::new();

    for phrase in GENERIC_PHRASES {
        if lowered.contains(phrase) {
            suggestions.push(WritingSuggestion {
                message: "Avoid generic phrases. Use specific action verbs to describe your impact.".to_string(),
                context: Some(phrase.to_string()),
            });
        }
    }

    if let Some(re) = cached_regex(&PASSIVE_RE, r"(?i)\b(?:was|were|is|are|been)\b\s+\w+ed\b") {
        for found in re.find_iter(text) {
            suggestions.push(WritingSuggestion {
                message: "Prefer active voice ('I built X') over passive voice ('X was built').".to_string(),
                context: Some(found.as_str().to_string()),
            });
        }
    }

    if !ACTION_VERBS.iter().any(|verb| lowered.contains(verb)) {
        suggestions.push(WritingSuggestion {
            message: "Start bullet points with strong action verbs like 'developed', 'optimized', or 'led'.".to_string(),
            context: None,
        });
    }

    suggestions
}

pub fn check_ats_friendliness(text: &str) -> AtsReport {
    let mut report = AtsReport {
        has_contact_info: matches(&ATS_EMAIL_RE, r"[\w.-]+@[\w.-]+", text)
            && matches(&ATS_PHONE_RE, r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}", text),
        ..AtsReport::default()
    };

    let lowered = text.to_lowercase();
    let found_sections = STANDARD_SECTIONS
        .iter()
        .filter(|section| lowered.contains(*section))
        .count();
    if found_sections >= 2 {
        report.uses_standard_sections = true;
    } else {
        report
            .warnings
            .push("Missing standard sections like 'Experience' or 'Skills'. Use simple text headers.".to_string());
    }

    if text.contains('\t') || text.replace('\n', "").contains("  ") {
        report.warnings.push(
            "Resume may contain complex formatting (tables or columns) that can confuse ATS. Use a single-column layout."
                .to_string(),
        );
    }

    report
}

fn keyword_hits(lowered: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lowered.contains(*k)).count()
}

/// Scores length, contact details, sections and wording out of 100.
pub fn analyze_resume_quality(text: &str) -> QualityAnalysis {
    let mut analysis = QualityAnalysis::default();

    if text.is_empty() {
        analysis.suggestions.push("Resume is empty. Please add content.".to_string());
        return analysis;
    }

    let lowered = text.to_lowercase();
    let mut score: u32 = 0;

    let word_count = text.split_whitespace().count();
    if (200..=800).contains(&word_count) {
        score += 15;
        analysis.strengths.push("Good resume length".to_string());
    } else if word_count < 200 {
        score += 5;
        analysis
            .areas_for_improvement
            .push("Resume is too short. Add more details about your experience.".to_string());
    } else {
        score += 10;
        analysis
            .areas_for_improvement
            .push("Resume might be too long. Consider condensing.".to_string());
    }

    let contact_hits = [
        matches(&EMAIL_RE, r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b", text),
        matches(&PHONE_RE, r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b", text),
        matches(&PROFILE_LINK_RE, r"(?i)\b(?:linkedin\.com|github\.com)\b", text),
    ]
    .iter()
    .filter(|hit| **hit)
    .count() as u32;
    score += contact_hits * 3;
    if contact_hits == 3 {
        analysis.strengths.push("Complete contact information".to_string());
    } else {
        analysis
            .areas_for_improvement
            .push("Add missing contact information".to_string());
    }

    if matches(&SKILLS_SECTION_RE, r"(?i)(?:skills|technical skills|core competencies)", text) {
        score += 20;
        analysis.strengths.push("Skills section present".to_string());
    } else {
        analysis
            .areas_for_improvement
            .push("Add a dedicated skills section".to_string());
    }

    match keyword_hits(&lowered, &EXPERIENCE_KEYWORDS) {
        n if n >= 3 => {
            score += 25;
            analysis.strengths.push("Strong experience descriptions".to_string());
        }
        n if n >= 1 => {
            score += 15;
            analysis
                .areas_for_improvement
                .push("Expand on your experience descriptions".to_string());
        }
        _ => analysis
            .areas_for_improvement
            .push("Add more detailed experience descriptions".to_string()),
    }

    if keyword_hits(&lowered, &EDUCATION_KEYWORDS) > 0 {
        score += 10;
        analysis.strengths.push("Education section present".to_string());
    } else {
        analysis
            .areas_for_improvement
            .push("Add education information".to_string());
    }

    match keyword_hits(&lowered, &ACHIEVEMENT_KEYWORDS) {
        n if n >= 5 => {
            score += 20;
            analysis.strengths.push("ATS-friendly language used".to_string());
        }
        n => {
            if n >= 2 {
                score += 10;
            }
            analysis
                .areas_for_improvement
                .push("Use more action verbs and quantifiable achievements".to_string());
        }
    }

    analysis.score = score.min(100) as u8;

    let overall = if analysis.score >= 80 {
        "Excellent resume! Consider adding more specific achievements."
    } else if analysis.score >= 60 {
        "Good resume. Focus on the areas for improvement listed above."
    } else {
        "Resume needs significant improvement. Address all areas listed above."
    };
    analysis.suggestions.push(overall.to_string());

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_quality_flags_generic_and_passive() {
        let suggestions = resume_quality("Responsible for deployments. The service was migrated last year.");
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].context.as_deref(), Some("responsible for"));
        assert_eq!(suggestions[1].context.as_deref(), Some("was migrated"));
        assert!(suggestions[2].context.is_none());
        assert!(suggestions[2].message.contains("action verbs"));
    }

    #[test]
    fn test_resume_quality_clean_text() {
        assert!(resume_quality("I built and optimized the billing pipeline.").is_empty());
    }

    #[test]
    fn test_ats_report() {
        let report = check_ats_friendliness("jane@mail.com (555) 123-4567\nExperience\nSkills\nRust");
        assert!(report.has_contact_info);
        assert!(report.uses_standard_sections);
        assert!(report.warnings.is_empty());

        let report = check_ats_friendliness("Name\tTitle\nProjects only");
        assert!(!report.has_contact_info);
        assert!(!report.uses_standard_sections);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_analyze_empty_resume() {
        let analysis = analyze_resume_quality("");
        assert_eq!(analysis.score, 0);
        assert_eq!(analysis.suggestions, vec!["Resume is empty. Please add content."]);
    }

    #[test]
    fn test_analyze_short_resume_score() {
        // short: 5, email + phone: 6, skills: 20, experience(experience, developed, led): 25,
        // education: 10, achievements(developed, led): 10
        let text = "jane@mail.com 555-123-4567 Experience: developed and led teams. Skills: Rust. Education: BSc";
        let analysis = analyze_resume_quality(text);
        assert_eq!(analysis.score, 76);
        assert!(analysis.strengths.contains(&"Strong experience descriptions".to_string()));
        assert!(analysis
            .areas_for_improvement
            .contains(&"Add missing contact information".to_string()));
        assert_eq!(
            analysis.suggestions,
            vec!["Good resume. Focus on the areas for improvement listed above."]
        );
    }

    #[test]
    fn test_analyze_strong_resume() {
        let filler = "word ".repeat(300);
        let text = format!(
            "jane@mail.com 555-123-4567 github.com/jane Skills Education Experience worked developed managed led created achieved increased improved {}",
            filler
        );
        let analysis = analyze_resume_quality(&text);
        assert_eq!(analysis.score, 99);
        assert!(analysis.areas_for_improvement.is_empty());
        assert_eq!(
            analysis.suggestions,
            vec!["Excellent resume! Consider adding more specific achievements."]
        );
    }
}
