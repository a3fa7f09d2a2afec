//! Matcher synthesis for newly learned patterns.
//!
//! A matcher is a regex built from the normalized message: literal text is
//! escaped, then each placeholder is re-expanded into the character class
//! matching what it replaced. Matchers are compiled case-insensitively, so
//! the lowercased literal text still matches raw telemetry.

use regex::{Regex, RegexBuilder};

use crate::signature::normalizer::{
    normalize_message, NUMBER_PLACEHOLDER, STRING_PLACEHOLDER, TIMESTAMP_PLACEHOLDER,
    UUID_PLACEHOLDER,
};

const UUID_CLASS: &str = "[0-9a-f-]{36}";
const TIMESTAMP_CLASS: &str = r"\d{4}-\d{2}-\d{2}t\d{2}:\d{2}:\d{2}";
const NUMBER_CLASS: &str = r"\d+";
const STRING_CLASS: &str = r#"["'].*?["']"#;

/// Builds the stored matcher for an error message.
pub fn synthesize_matcher(message: &str) -> String {
    let normalized = normalize_message(message);
    // The placeholder tokens contain no regex metacharacters, so they
    // survive escaping intact and can be expanded afterwards.
    regex::escape(&normalized)
        .replace(UUID_PLACEHOLDER, UUID_CLASS)
        .replace(TIMESTAMP_PLACEHOLDER, TIMESTAMP_CLASS)
        .replace(NUMBER_PLACEHOLDER, NUMBER_CLASS)
        .replace(STRING_PLACEHOLDER, STRING_CLASS)
}

/// Compiles a stored matcher. Returns `None` for matchers that no longer
/// compile, which callers treat as "does not match".
pub fn compile_matcher(matcher: &str) -> Option<Regex> {
    RegexBuilder::new(matcher).case_insensitive(true).build().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(matcher: &str, message: &str) -> bool {
        compile_matcher(matcher).is_some_and(|re| re.is_match(message))
    }

    #[test]
    fn digit_runs_expand_to_digit_classes() {
        let matcher = synthesize_matcher("Connection failed on port 5432");
        assert_eq!(matcher, r"connection failed on port \d+");
        assert!(matches(&matcher, "Connection failed on port 8080"));
        assert!(!matches(&matcher, "Disk full"));
    }

    #[test]
    fn uuids_expand_to_hex_classes() {
        let matcher = synthesize_matcher("User d290f1ee-6c54-4b01-90e6-d701748f0851 not found");
        assert!(matches(&matcher, "User a1b2c3d4-e5f6-7890-abcd-ef1234567890 not found"));
        assert!(matches(&matcher, "user D290F1EE-6C54-4B01-90E6-D701748F0851 not found"));
    }

    #[test]
    fn quoted_strings_expand_to_quote_classes() {
        let matcher = synthesize_matcher("Table \"users\" does not exist");
        assert!(matches(&matcher, "Table \"products\" does not exist"));
        assert!(matches(&matcher, "table 'orders' does not exist"));
    }

    #[test]
    fn timestamps_expand_and_match_uppercase_t() {
        let matcher = synthesize_matcher("Request failed at 2025-12-15T10:30:00Z");
        assert!(matches(&matcher, "Request failed at 2026-01-02T03:04:05Z"));
    }

    #[test]
    fn literal_metacharacters_are_escaped() {
        let matcher = synthesize_matcher("Error (code 5) [critical]");
        assert!(matches(&matcher, "Error (code 9) [critical]"));
        assert!(!matches(&matcher, "Error code 9 critical"));
    }
}
