// Helper functions for safe logging, skill lists and cached regexes

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Timestamps are stored as second-precision RFC 3339 UTC strings so that
/// lexical order in SQL matches chronological order.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Masks email addresses for safe logging
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 && !parts[0].is_empty() {
            let first: String = parts[0].chars().take(1).collect();
            format!("{}***@{}", first, parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Splits a comma separated skill list into trimmed, non-empty entries.
pub fn split_skills(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalises a user-entered skill list to `"a, b, c"`.
pub fn clean_skills_csv(csv: &str) -> String {
    split_skills(csv).join(", ")
}

/// Compiles `pattern` once per cell. A pattern that fails to compile yields
/// `None`, and callers treat that as "no match".
pub fn cached_regex(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Rejects file names that could escape the upload directory.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_email_log() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
        assert_eq!(safe_email_log("abc"), "***@***.***");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
    }

    #[test]
    fn test_clean_skills() {
        assert_eq!(
            split_skills(" Rust, ,python ,  SQL,"),
            vec!["Rust", "python", "SQL"]
        );
        assert_eq!(clean_skills_csv("a,b ,, c"), "a, b, c");
        assert_eq!(clean_skills_csv(" , "), "");
    }

    #[test]
    fn test_timestamp_roundtrip_is_lexically_ordered() {
        let earlier = parse_timestamp("2024-01-01T09:00:00+02:00").unwrap();
        let later = parse_timestamp("2024-01-01T08:00:00Z").unwrap();
        assert!(format_timestamp(earlier) < format_timestamp(later));
        assert_eq!(format_timestamp(later), "2024-01-01T08:00:00Z");
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_safe_filename() {
        assert!(is_safe_filename("R_ABC123.pdf"));
        assert!(!is_safe_filename("../secret"));
        assert!(!is_safe_filename("a/b.pdf"));
        assert!(!is_safe_filename(".env"));
        assert!(!is_safe_filename(""));
    }
}
