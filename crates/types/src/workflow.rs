//! Workflow catalog, dispatch and run models.
//!
//! Catalog entries mirror the provider's `GET /repos/{owner}/{repo}/actions/workflows`
//! payload. Dispatch inputs preserve author order (via `IndexMap`) so the request
//! body matches what the caller wrote.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// A single entry in the remote workflow catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct WorkflowDescriptor {
    /// Numeric identifier assigned by the provider.
    pub id: u64,
    /// Display name declared in the workflow file (`name:`), or the path when absent.
    pub name: String,
    /// Storage path within the repository, e.g. `.github/workflows/build.yml`.
    pub path: String,
    /// Provider state such as `active` or `disabled_manually`.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl WorkflowDescriptor {
    pub fn new(id: u64, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            state: None,
            html_url: None,
        }
    }
}

/// One page of the workflow catalog as returned by the provider.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WorkflowCatalogPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub workflows: Vec<WorkflowDescriptor>,
}

/// Body of a workflow dispatch call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Branch, tag or commit the workflow runs against.
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub inputs: IndexMap<String, String>,
}

/// Error raised when the caller-supplied inputs are not a flat JSON object.
#[derive(Debug, Error)]
pub enum InputsError {
    #[error("inputs must be valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("inputs must be a JSON object of key/value pairs, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("input '{key}' must be a string, number or boolean, got {kind}")]
    UnsupportedValue { key: String, kind: &'static str },
}

impl DispatchRequest {
    pub fn new(git_ref: impl Into<String>, inputs: IndexMap<String, String>) -> Self {
        Self {
            git_ref: git_ref.into(),
            inputs,
        }
    }

    /// Build a request from a serialized inputs document.
    ///
    /// A blank document is treated as an empty mapping. Numbers and booleans are
    /// rendered to their JSON text since the provider only accepts string inputs.
    pub fn from_json_inputs(git_ref: impl Into<String>, raw_inputs: &str) -> Result<Self, InputsError> {
        let inputs = parse_inputs(raw_inputs)?;
        Ok(Self::new(git_ref, inputs))
    }
}

fn parse_inputs(raw_inputs: &str) -> Result<IndexMap<String, String>, InputsError> {
    if raw_inputs.trim().is_empty() {
        return Ok(IndexMap::new());
    }

    let document: JsonValue = serde_json::from_str(raw_inputs)?;
    let map = match document {
        JsonValue::Object(map) => map,
        other => return Err(InputsError::NotAnObject { kind: json_kind(&other) }),
    };

    let mut inputs = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        let rendered = match value {
            JsonValue::String(text) => text,
            JsonValue::Bool(_) | JsonValue::Number(_) => value.to_string(),
            other => {
                return Err(InputsError::UnsupportedValue {
                    key,
                    kind: json_kind(&other),
                });
            }
        };
        inputs.insert(key, rendered);
    }
    Ok(inputs)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Status reported by the provider for a dispatch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchStatus {
    Queued,
    /// Any other status, kept verbatim for reporting.
    Other(String),
}

impl DispatchStatus {
    pub fn from_provider(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("queued") {
            Self::Queued
        } else {
            Self::Other(raw.trim().to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Other(raw) => raw,
        }
    }
}

/// Immediate, synchronous result of a dispatch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub status: DispatchStatus,
    /// URL of the run collection the dispatch was queued into, when the provider returned one.
    pub workflow_run_url: Option<String>,
}

impl DispatchOutcome {
    /// True when the outcome carries enough information to look up the run it produced.
    pub fn is_correlation_ready(&self) -> bool {
        self.status == DispatchStatus::Queued && self.workflow_run_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

/// The run a dispatch produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunHandle {
    pub id: u64,
    /// API URL of the run record.
    #[serde(default)]
    pub url: Option<String>,
    /// Browser URL of the run.
    #[serde(default)]
    pub html_url: Option<String>,
}
