use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-user-per-level attempt/completion record.
///
/// One row exists per (user, level_number) pair. `attempts` only grows,
/// `is_completed` flips false→true exactly once, and the completion fields
/// are written on that transition and never again.
#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub level_number: i64,
    pub is_completed: bool,
    pub stars: i64,
    pub attempts: i64,
    pub completed_at: Option<DateTime<Utc>>,
    pub xp_earned: i64,
}

/// Grading rule: exact match after trimming leading/trailing whitespace on
/// both sides. Internal whitespace differences fail the comparison.
pub fn grade_output(submitted: &str, expected: &str) -> bool {
    submitted.trim() == expected.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_newline_is_ignored() {
        assert!(grade_output("Hello, World!\n", "Hello, World!"));
        assert!(grade_output("  Hello, World!  ", "Hello, World!"));
    }

    #[test]
    fn internal_whitespace_matters() {
        assert!(!grade_output("Hello,  World!", "Hello, World!"));
        assert!(!grade_output("1\n2\n3", "1\n2\n3\n4"));
    }

    #[test]
    fn multiline_output_matches_exactly() {
        assert!(grade_output("1\n2\n3\n4\n5\n", "1\n2\n3\n4\n5"));
    }
}
