// src/matching/text.rs
//! Bag-of-words keyword matching: tokenizer, cosine similarity and fuzzy
//! skill extraction against a canonical technology list.

use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

use crate::common::helpers::{cached_regex, split_skills};

pub const FUZZY_THRESHOLD: f64 = 0.84;

pub const CANONICAL_SKILLS: [&str; 50] = [
    // Programming
    "python", "java", "javascript", "typescript", "c++", "c#", "go", "ruby", "php", "swift", "kotlin",
    // Web / Backend
    "django", "flask", "fastapi", "spring", "spring boot", "node", "express", "graphql", "rest",
    // Frontend
    "react", "next.js", "vue", "angular", "svelte", "html", "css", "tailwind", "bootstrap",
    // Data / Cloud
    "sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "aws", "gcp", "azure",
    "kubernetes", "docker", "terraform", "spark", "hadoop", "pandas", "numpy", "scikit-learn",
    // Mobile
    "android", "ios", "react native", "flutter",
];

pub type TermVector = HashMap<String, u32>;

static TOKEN_RE: OnceLock<Option<Regex>> = OnceLock::new();

pub fn tokenize(text: &str) -> Vec<String> {
    match cached_regex(&TOKEN_RE, r"[a-zA-Z0-9+#.]+") {
        Some(re) => re.find_iter(text).map(|m| m.as_str().to_lowercase()).collect(),
        None => Vec::new(),
    }
}

pub fn bag_of_words<I, S>(tokens: I) -> TermVector
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts = TermVector::new();
    for token in tokens {
        *counts.entry(token.into()).or_insert(0) += 1;
    }
    counts
}

pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(term, &count)| b.get(term).map(|&other| f64::from(count) * f64::from(other)))
        .sum();
    let norm = |v: &TermVector| v.values().map(|&c| f64::from(c).powi(2)).sum::<f64>().sqrt();
    let (na, nb) = (norm(a), norm(b));

    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

// ============================================================================
// Sequence similarity
// ============================================================================

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start_a, start_b, len)`, earliest in `a` then `b` on ties.
fn longest_match(a: &[char], alo: usize, ahi: usize, b: &[char], blo: usize, bhi: usize) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    let mut previous = vec![0usize; bhi + 1];

    for i in alo..ahi {
        let mut current = vec![0usize; bhi + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = if j > blo { previous[j - 1] + 1 } else { 1 };
                current[j] = k;
                if k > best_len {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_len = k;
                }
            }
        }
        previous = current;
    }

    (best_i, best_j, best_len)
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, alo, ahi, b, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    total
}

/// `2 * M / T`, where `M` counts characters in recursively found longest
/// matching blocks and `T` is the combined length.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

// ============================================================================
// Skill extraction and scoring
// ============================================================================

/// Canonical skills present in `text`, exactly or (single-token skills only)
/// within `threshold` similarity. Sorted and unique.
pub fn extract_skills_from_text(text: &str, threshold: f64) -> Vec<String> {
    let tokens: HashSet<String> = tokenize(text).into_iter().collect();
    let mut found = BTreeSet::new();

    for skill in CANONICAL_SKILLS {
        if tokens.contains(skill) {
            found.insert(skill.to_string());
        } else if !skill.contains(' ')
            && tokens
                .iter()
                .any(|token| sequence_ratio(token, skill) >= threshold)
        {
            found.insert(skill.to_string());
        }
    }

    found.into_iter().collect()
}

/// The profile's own skills followed by any inferred from `extra_text`,
/// plus the term vector over both.
pub fn compute_resume_keywords(skills_csv: &str, extra_text: &str) -> (Vec<String>, TermVector) {
    let mut skills = split_skills(skills_csv);

    if !extra_text.is_empty() {
        for inferred in extract_skills_from_text(extra_text, FUZZY_THRESHOLD) {
            if !skills.contains(&inferred) {
                skills.push(inferred);
            }
        }
    }

    let tokens = tokenize(&format!("{} {}", skills.join(" "), extra_text));
    (skills, bag_of_words(tokens))
}

/// Maps cosine similarity onto 0..=100 with a gentle boost.
pub fn score_job_match(resume_vector: &TermVector, job_text: &str) -> u8 {
    let job_vector = bag_of_words(tokenize(job_text));
    let similarity = cosine_similarity(resume_vector, &job_vector);
    (similarity * 140.0).round_ties_even().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_symbols() {
        assert_eq!(
            tokenize("C++, C# and Node.js (REST)"),
            vec!["c++", "c#", "and", "node.js", "rest"]
        );
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_cosine_similarity() {
        let a = bag_of_words(["rust", "sql"]);
        let b = bag_of_words(["rust", "sql"]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);

        let c = bag_of_words(["java"]);
        assert_eq!(cosine_similarity(&a, &c), 0.0);
        assert_eq!(cosine_similarity(&a, &TermVector::new()), 0.0);
    }

    #[test]
    fn test_sequence_ratio() {
        assert_eq!(sequence_ratio("python", "python"), 1.0);
        // "abcd" vs "bcde": one block "bcd" -> 2*3/8
        assert!((sequence_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert!(sequence_ratio("pyhton", "python") >= 0.8);
        assert!(sequence_ratio("java", "javascript") < FUZZY_THRESHOLD);
    }

    #[test]
    fn test_extract_skills_exact_and_fuzzy() {
        let skills = extract_skills_from_text("Experienced with Pythonn, Docker and react native", FUZZY_THRESHOLD);
        assert!(skills.contains(&"python".to_string()));
        assert!(skills.contains(&"docker".to_string()));
        assert!(skills.contains(&"react".to_string()));
        // multi-word skills never match token-by-token
        assert!(!skills.contains(&"react native".to_string()));
        let mut sorted = skills.clone();
        sorted.sort();
        assert_eq!(skills, sorted);
    }

    #[test]
    fn test_compute_resume_keywords_appends_inferred() {
        let (skills, vector) = compute_resume_keywords("Python, Leadership", "Shipped Docker images for python apps");
        assert_eq!(skills, vec!["Python", "Leadership", "docker", "python"]);
        assert_eq!(vector.get("python"), Some(&3));
    }

    #[test]
    fn test_score_job_match_bounds() {
        let (_, vector) = compute_resume_keywords("Python, Django, SQL", "");
        assert_eq!(score_job_match(&vector, "python django sql"), 100);
        assert_eq!(score_job_match(&vector, "forklift driver"), 0);
        assert_eq!(score_job_match(&TermVector::new(), "python"), 0);

        let partial = score_job_match(&vector, "python developer wanted for marketing analytics");
        assert!(partial > 0 && partial < 100);
    }
}
