//! Message normalization for signature generation.
//!
//! Variable substrings are rewritten to fixed placeholder tokens so that
//! two messages differing only in embedded identifiers collapse to the same
//! normal form. Replacement order matters: UUIDs and timestamps are
//! rewritten before bare digit runs so their digits are not consumed
//! piecemeal.

use std::sync::LazyLock;

use regex::Regex;

pub const UUID_PLACEHOLDER: &str = "<uuid>";
pub const TIMESTAMP_PLACEHOLDER: &str = "<ts>";
pub const NUMBER_PLACEHOLDER: &str = "<num>";
pub const STRING_PLACEHOLDER: &str = "<str>";

static RE_UUID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").ok()
});

static RE_TIMESTAMP: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").ok());

static RE_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d+").ok());

static RE_QUOTED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r#"["'].*?["']"#).ok());

/// Normalizes an error message into its signature-ready form:
/// placeholders for variable substrings, lowercased, trimmed.
pub fn normalize_message(message: &str) -> String {
    let text = replace_all(&RE_UUID, message, UUID_PLACEHOLDER);
    let text = replace_all(&RE_TIMESTAMP, &text, TIMESTAMP_PLACEHOLDER);
    let text = replace_all(&RE_NUMBER, &text, NUMBER_PLACEHOLDER);
    let text = replace_all(&RE_QUOTED, &text, STRING_PLACEHOLDER);
    text.to_lowercase().trim().to_string()
}

fn replace_all(re: &LazyLock<Option<Regex>>, text: &str, placeholder: &str) -> String {
    match re.as_ref() {
        Some(re) => re.replace_all(text, placeholder).into_owned(),
        None => text.to_string(),
    }
}
