//! Resolution of the run a dispatch produced.
//!
//! The dispatch endpoint never returns a run id; it only accepts the trigger.
//! When the reply points at a run collection, one follow-up read of that URL
//! yields the run record.

use serde_json::Value;
use tracing::debug;
use wfd_api::WorkflowApi;
use wfd_types::{DispatchOutcome, RunHandle};

use crate::DispatchError;

/// Look up the run behind a correlation-ready outcome.
///
/// Returns `Ok(None)` without any request when the outcome is not ready.
pub async fn correlate_run<A: WorkflowApi + ?Sized>(api: &A, outcome: &DispatchOutcome) -> Result<Option<RunHandle>, DispatchError> {
    if !outcome.is_correlation_ready() {
        return Ok(None);
    }
    let Some(url) = outcome.workflow_run_url.as_deref() else {
        return Ok(None);
    };

    let payload = api.get_run(url).await?;
    let run = run_from_payload(&payload).ok_or_else(|| DispatchError::MissingRunId { url: url.to_string() })?;
    debug!(run_id = run.id, "run correlated");
    Ok(Some(run))
}

/// Accepts either a single run record or a `workflow_runs` collection (newest first).
fn run_from_payload(payload: &Value) -> Option<RunHandle> {
    if let Some(run) = run_from_record(payload) {
        return Some(run);
    }
    payload
        .get("workflow_runs")
        .and_then(Value::as_array)
        .and_then(|runs| runs.first())
        .and_then(run_from_record)
}

fn run_from_record(record: &Value) -> Option<RunHandle> {
    let id = record.get("id").and_then(Value::as_u64)?;
    let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
    Some(RunHandle {
        id,
        url: text("url"),
        html_url: text("html_url"),
    })
}
