//! Helpers shared by the workflow dispatch crates: HTTP response parsing,
//! `Link` header pagination and secret redaction for log output.

use once_cell::sync::Lazy;
use regex::Regex;

pub mod http;

pub use http::{encode_path_segment, find_link_relation, next_page_link};

static SENSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization: )([\w\-\.=:/+ ]+)",
        r"(?i)(bearer )([\w\-\.=:/+]+)",
        r"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
        r"((?:ghp|gho|ghu|ghs|ghr)_)([A-Za-z0-9]{20,})",
        r"(github_pat_)([A-Za-z0-9_]{20,})",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in SENSITIVE_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}
