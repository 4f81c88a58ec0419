// src/matching/skills.rs
//! Explicit and inferred skill extraction over normalised resume text

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::common::helpers::cached_regex;

pub const DEFAULT_SKILLS: [&str; 43] = [
    "python", "java", "c", "c++", "c#", ".net", "javascript", "typescript",
    "node", "node.js", "react", "angular", "vue", "django", "flask",
    "spring", "fastapi", "sql", "mysql", "postgres", "mongodb", "redis",
    "elasticsearch", "aws", "azure", "gcp", "docker", "kubernetes",
    "terraform", "linux", "pandas", "numpy", "scikit-learn", "sklearn",
    "tensorflow", "pytorch", "nlp", "llm", "machine learning",
    "deep learning", "data science", "etl", "airflow",
];

const SKILL_SYNONYMS: [(&str, &str); 7] = [
    ("js", "javascript"),
    ("ts", "typescript"),
    ("tf", "tensorflow"),
    ("scikit learn", "scikit-learn"),
    ("ml", "machine learning"),
    ("dl", "deep learning"),
    ("postgresql", "postgres"),
];

/// Soft skills implied by how experience is described
const SKILL_TRIGGERS: [(&str, &[&str]); 7] = [
    ("management", &["manage", "led a team", "spearheaded", "oversaw", "directed the"]),
    ("leadership", &["led", "lead", "mentored", "guided", "directed", "coached"]),
    ("communication", &["presented", "authored", "negotiated", "liaised", "wrote"]),
    ("problem-solving", &["optimized", "resolved", "troubleshoot", "debugged", "fixed"]),
    ("software development", &["developed", "engineered", "built", "coded", "programmed"]),
    ("data analysis", &["analyzed", "interpreted", "visualized data", "data model"]),
    ("design", &["designed", "prototyped", "wireframed", "ux", "ui"]),
];

static NORMALIZE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static WHITESPACE_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Lowercases, replaces anything outside `[a-z0-9+.#/- ]` with a space and
/// collapses whitespace.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned = match cached_regex(&NORMALIZE_RE, r"[^a-z0-9+.#/\- ]+") {
        Some(re) => re.replace_all(&lowered, " ").into_owned(),
        None => lowered,
    };
    match cached_regex(&WHITESPACE_RE, r"\s+") {
        Some(re) => re.replace_all(&cleaned, " ").trim().to_string(),
        None => cleaned.trim().to_string(),
    }
}

pub fn canonicalize_skill(token: &str) -> String {
    let token = token.trim().to_lowercase();
    SKILL_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(token)
}

fn is_default_skill(skill: &str) -> bool {
    DEFAULT_SKILLS.contains(&skill)
}

/// Known skills named in `text` as unigrams or bigrams, plus any of `custom`
/// found verbatim. Sorted and unique.
pub fn extract_skills(text: &str, custom: &[String]) -> Vec<String> {
    let normalized = normalize(text);
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    let mut found = BTreeSet::new();

    for token in &tokens {
        let skill = canonicalize_skill(token);
        if is_default_skill(&skill) {
            found.insert(skill);
        }
    }

    for pair in tokens.windows(2) {
        let skill = canonicalize_skill(&format!("{} {}", pair[0], pair[1]));
        if is_default_skill(&skill) {
            found.insert(skill);
        }
    }

    for skill in custom {
        let skill = canonicalize_skill(skill);
        if !skill.is_empty() && normalized.contains(&skill) {
            found.insert(skill);
        }
    }

    found.into_iter().collect()
}

pub fn infer_skills_from_text(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut inferred: Vec<String> = SKILL_TRIGGERS
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| lowered.contains(t)))
        .map(|(skill, _)| skill.to_string())
        .collect();
    inferred.sort();
    inferred
}

// ============================================================================
// Job-description skill patterns
// ============================================================================

const SKILL_PATTERNS: [&str; 7] = [
    r"(?i)\b(?:Python|Java|JavaScript|C\+\+|C#|PHP|Ruby|Go|Swift|Kotlin)\b",
    r"(?i)\b(?:React|Angular|Vue|Node\.?js|Express|Django|Flask|Spring|Laravel)\b",
    r"(?i)\b(?:HTML|CSS|JavaScript|TypeScript|Bootstrap|Tailwind|Sass|Less)\b",
    r"(?i)\b(?:MySQL|PostgreSQL|MongoDB|Redis|SQLite|Oracle|SQL Server)\b",
    r"(?i)\b(?:AWS|Azure|Google Cloud|Docker|Kubernetes|Jenkins|Git|GitHub)\b",
    r"(?i)\b(?:Machine Learning|AI|Data Science|Analytics|Statistics|R|Pandas|NumPy)\b",
    r"(?i)\b(?:Agile|Scrum|Kanban|Project Management|Leadership|Communication)\b",
];

static SKILL_PATTERN_RES: OnceLock<Vec<Regex>> = OnceLock::new();

fn skill_patterns() -> &'static [Regex] {
    SKILL_PATTERN_RES.get_or_init(|| {
        SKILL_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    })
}

fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Technology and practice names mentioned in a posting, title-cased and
/// de-duplicated, at most 20.
pub fn extract_job_skills(text: &str) -> Vec<String> {
    let mut found = BTreeSet::new();
    for re in skill_patterns() {
        for m in re.find_iter(text) {
            let skill = m.as_str().trim();
            if !skill.is_empty() {
                found.insert(title_case(skill));
            }
        }
    }
    found.into_iter().take(20).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Hello,   WORLD!! C++/C#  "), "hello world c++/c#");
        assert_eq!(normalize("line\nbreak\ttab"), "line break tab");
    }

    #[test]
    fn test_extract_skills_with_synonyms_and_bigrams() {
        let skills = extract_skills("Worked with JS, TS and PostgreSQL; some ML and Machine Learning. Deep learning too.", &[]);
        assert_eq!(
            skills,
            vec!["deep learning", "javascript", "machine learning", "postgres", "typescript"]
        );
    }

    #[test]
    fn test_extract_skills_custom_list() {
        let skills = extract_skills("Fluent in COBOL and Rust", &["Rust".to_string(), "Haskell".to_string()]);
        assert_eq!(skills, vec!["rust"]);
    }

    #[test]
    fn test_infer_skills() {
        let inferred = infer_skills_from_text("Mentored juniors and debugged production incidents. Designed the API.");
        assert_eq!(inferred, vec!["design", "leadership", "problem-solving"]);
        assert!(infer_skills_from_text("").is_empty());
    }

    #[test]
    fn test_extract_job_skills() {
        let skills = extract_job_skills("We use python, Node.js and AWS. Agile team.");
        assert!(skills.contains(&"Python".to_string()));
        assert!(skills.contains(&"Node.Js".to_string()));
        assert!(skills.contains(&"Aws".to_string()));
        assert!(skills.contains(&"Agile".to_string()));
    }
}
