//! Lexical feature extraction from raw error text.
//!
//! Pure and deterministic: no I/O, no clocks. Regexes that fail to
//! compile at init time degrade to "no match" rather than panicking.

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_SQL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:select|insert|update|delete|from|where)\b").ok());

static RE_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z][a-zA-Z0-9+.\-]*://\S+").ok());

static RE_UUID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").ok()
});

const CRITICAL_KEYWORDS: [&str; 5] = ["fatal", "crash", "critical", "security", "breach"];
const ERROR_KEYWORDS: [&str; 4] = ["error", "fail", "exception", "invalid"];
const WARNING_KEYWORDS: [&str; 3] = ["warn", "deprecated", "slow"];

/// One automaton over all severity keywords; pattern index maps back to
/// the tier via the declaration order above.
static SEVERITY_KEYWORDS: LazyLock<Option<AhoCorasick>> = LazyLock::new(|| {
    let keywords = CRITICAL_KEYWORDS
        .iter()
        .chain(ERROR_KEYWORDS.iter())
        .chain(WARNING_KEYWORDS.iter());
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(keywords)
        .ok()
});

/// Lexical features of one error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorFeatures {
    pub message_length: usize,
    pub word_count: usize,
    pub has_stack_trace: bool,
    pub has_sql: bool,
    pub has_url: bool,
    pub has_uuid: bool,
    pub error_code: Option<String>,
    /// 5 critical, 3 error, 2 warning, 1 baseline.
    pub severity_score: u8,
    pub source_component: String,
}

/// Extracts lexical features from an error message.
pub fn extract_features(message: &str, source: &str) -> ErrorFeatures {
    ErrorFeatures {
        message_length: message.len(),
        word_count: message.split_whitespace().count(),
        has_stack_trace: detect_stack_trace(message),
        has_sql: RE_SQL.as_ref().is_some_and(|re| re.is_match(message)),
        has_url: RE_URL.as_ref().is_some_and(|re| re.is_match(message)),
        has_uuid: RE_UUID.as_ref().is_some_and(|re| re.is_match(message)),
        error_code: extract_error_code(message),
        severity_score: severity_score(message),
        source_component: source.to_string(),
    }
}

/// A stack trace is a multi-line message with indented `at `-style frames.
fn detect_stack_trace(message: &str) -> bool {
    if !message.contains('\n') {
        return false;
    }
    message.lines().any(|line| {
        (line.starts_with(' ') || line.starts_with('\t'))
            && line.trim_start().starts_with("at ")
    })
}

/// The leading alphanumeric token when it is immediately followed by a
/// colon, e.g. `PGRST116: row not found` yields `PGRST116`.
fn extract_error_code(message: &str) -> Option<String> {
    let trimmed = message.trim_start();
    let colon = trimmed.find(':')?;
    if colon == 0 {
        return None;
    }
    let token = &trimmed[..colon];
    if token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Some(token.to_string())
    } else {
        None
    }
}

/// Keyword-tier severity: the strongest tier with a hit wins.
fn severity_score(message: &str) -> u8 {
    let Some(automaton) = SEVERITY_KEYWORDS.as_ref() else {
        return 1;
    };
    let mut score = 1u8;
    for hit in automaton.find_iter(message) {
        let index = hit.pattern().as_usize();
        let tier = if index < CRITICAL_KEYWORDS.len() {
            5
        } else if index < CRITICAL_KEYWORDS.len() + ERROR_KEYWORDS.len() {
            3
        } else {
            2
        };
        score = score.max(tier);
    }
    score
}
