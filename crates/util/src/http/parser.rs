//! # HTTP response parsing
//!
//! Strict JSON decoding with contextual errors, plus extraction of the
//! provider's free-text error message from failed responses.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Return a user-friendly error message for common HTTP status codes.
///
/// # Example
/// ```rust
/// use wfd_util::http::status_error_message;
///
/// let error_401 = status_error_message(401).unwrap();
/// assert!(error_401.contains("token"));
/// assert!(error_401.contains("Unauthorized"));
///
/// let error_404 = status_error_message(404).unwrap();
/// assert!(error_404.contains("Not Found"));
///
/// assert!(status_error_message(500).is_none());
/// ```
pub fn status_error_message(status_code: u16) -> Option<String> {
    match status_code {
        401 => Some("Unauthorized (401). Hint: check that the token input is set and has not expired".into()),
        403 => Some("Forbidden (403). Hint: the token needs the actions:write permission on the target repository".into()),
        404 => Some("Not Found (404). Hint: check the repository name and that the token can see it".into()),
        _ => None,
    }
}

/// Extract the provider's error message from a failed response body.
///
/// Error payloads look like `{"message": "...", "documentation_url": "..."}`.
/// Bodies that are not JSON, or carry no `message`, yield `None`.
///
/// ```rust
/// use wfd_util::http::provider_error_message;
///
/// let body = r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#;
/// assert_eq!(provider_error_message(body).as_deref(), Some("Not Found"));
/// assert!(provider_error_message("<html>").is_none());
/// ```
pub fn provider_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Parse HTTP response text into JSON, providing detailed errors on failure.
///
/// Any parsing error is decorated with the originating HTTP status code and a
/// truncated preview of the response body.
///
/// # Errors
/// Returns a [`JsonParseError`] describing the parse failure. The message
/// includes the original serde error and up to 200 characters of the response
/// body (with whitespace collapsed).
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|error| decode_error(text, status, error))
}

/// Wrap a serde error raised while decoding `text` into a [`JsonParseError`].
///
/// Use this when a response parsed as JSON but did not match the expected shape.
pub fn decode_error(text: &str, status: Option<StatusCode>, error: serde_json::Error) -> JsonParseError {
    let status_note = status
        .map(|code| format!("status {code}"))
        .unwrap_or_else(|| "unknown status".to_string());
    let preview = truncate_response_preview(text, 200);

    JsonParseError::new(status_note, error, preview)
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// Access the truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_reports_status_and_preview() {
        let error = parse_response_json_strict("{\n\t\"id\": ", Some(StatusCode::OK)).expect_err("truncated body");
        let message = error.to_string();
        assert!(message.contains("status 200 OK"), "message: {message}");
        assert_eq!(error.body_preview(), "{ \"id\":");
    }

    #[test]
    fn empty_body_preview_is_marked() {
        let error = parse_response_json_strict("", None).expect_err("empty body");
        assert_eq!(error.body_preview(), "<empty>");
        assert!(error.to_string().contains("unknown status"));
    }

    #[test]
    fn long_previews_are_truncated() {
        let body = format!("<html>{}</html>", "x".repeat(500));
        let error = parse_response_json_strict(&body, Some(StatusCode::BAD_GATEWAY)).expect_err("html body");
        assert!(error.body_preview().ends_with("..."));
        assert!(error.body_preview().len() <= 203);
    }

    #[test]
    fn provider_message_ignores_blank_messages() {
        assert!(provider_error_message(r#"{"message":"  "}"#).is_none());
        assert!(provider_error_message(r#"{"errors":[]}"#).is_none());
    }
}
