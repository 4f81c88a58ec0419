// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Every row gets a prefixed, human-readable ID: `PREFIX_XXXXXX`
//! (e.g. `J_K7NP3X` for a job posting). The random part never contains
//! I, L, O or U.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityPrefix {
    /// User account (U_)
    User,
    /// Company profile (C_)
    Company,
    /// Job posting (J_)
    Job,
    /// Job category (G_) - G for Group
    Category,
    /// Application (A_)
    Application,
    /// Application status history (H_)
    History,
    /// Bookmark (B_)
    Bookmark,
    /// Notification (N_)
    Notification,
    /// Uploaded resume file (R_)
    Resume,
    /// Uploaded profile picture (P_)
    Picture,
    /// Uploaded company logo (L_)
    Logo,
}

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Company => "C",
            EntityPrefix::Job => "J",
            EntityPrefix::Category => "G",
            EntityPrefix::Application => "A",
            EntityPrefix::History => "H",
            EntityPrefix::Bookmark => "B",
            EntityPrefix::Notification => "N",
            EntityPrefix::Resume => "R",
            EntityPrefix::Picture => "P",
            EntityPrefix::Logo => "L",
        }
    }
}

fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID, e.g. `generate_id(EntityPrefix::Job)` -> `"J_K7NP3X"`
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate a raw Crockford Base32 string without prefix
pub fn generate_raw_id(length: usize) -> String {
    generate_crockford_string(length)
}

/// Storage name for an uploaded file: `R_XXXXXXXXXX.pdf`.
///
/// Ten random characters keep collisions negligible for files, which are
/// never looked up by a unique index.
pub fn generate_file_name(prefix: EntityPrefix, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        prefix.as_str(),
        generate_crockford_string(10),
        extension.trim_start_matches('.').to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let job_id = generate_id(EntityPrefix::Job);
        assert!(job_id.starts_with("J_"));
        assert_eq!(job_id.len(), 8); // "J_" + 6 chars
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_id(EntityPrefix::Application);
        let random_part = &id[2..];

        for c in random_part.chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "Character '{}' not in Crockford alphabet",
                c
            );
        }
        assert!(!random_part.contains('I'));
        assert!(!random_part.contains('L'));
        assert!(!random_part.contains('O'));
        assert!(!random_part.contains('U'));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            assert!(ids.insert(generate_id(EntityPrefix::Job)), "Duplicate ID generated");
        }
    }

    #[test]
    fn test_all_prefixes() {
        let expected = [
            (EntityPrefix::User, "U_"),
            (EntityPrefix::Company, "C_"),
            (EntityPrefix::Job, "J_"),
            (EntityPrefix::Category, "G_"),
            (EntityPrefix::Application, "A_"),
            (EntityPrefix::History, "H_"),
            (EntityPrefix::Bookmark, "B_"),
            (EntityPrefix::Notification, "N_"),
        ];
        for (prefix, start) in expected {
            assert!(generate_id(prefix).starts_with(start));
        }
    }

    #[test]
    fn test_file_name() {
        let name = generate_file_name(EntityPrefix::Resume, ".PDF");
        assert!(name.starts_with("R_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), "R_".len() + 10 + ".pdf".len());
    }

    #[test]
    fn test_raw_id() {
        let raw = generate_raw_id(8);
        assert_eq!(raw.len(), 8);
        assert!(!raw.contains('_'));
    }
}
