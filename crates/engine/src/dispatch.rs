//! Workflow dispatch and classification of the provider's immediate reply.

use serde_json::Value;
use tracing::debug;
use wfd_api::{ApiError, DispatchReply, WorkflowApi};
use wfd_types::{DispatchOutcome, DispatchRequest, DispatchStatus, RepositorySlug};

/// Trailing phrase of the provider's rejection message for disabled workflows.
pub const DISABLED_WORKFLOW_SUFFIX: &str = "a disabled workflow";

/// True when a provider error message says the workflow is disabled.
///
/// The provider offers no structured code for this case, only free text such as
/// `Cannot trigger a 'workflow_dispatch' on a disabled workflow`.
pub fn is_disabled_workflow_error(message: &str) -> bool {
    message.trim_end().ends_with(DISABLED_WORKFLOW_SUFFIX)
}

/// Classified result of a dispatch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// Queued with a run-collection URL; the run can be correlated.
    Ready(DispatchOutcome),
    /// Accepted, but the reply is not in the shape needed for correlation.
    Unconfirmed(DispatchOutcome),
    /// Rejected because the workflow is disabled.
    Disabled { message: String },
}

/// Trigger `workflow_id` and classify the reply.
///
/// Every provider error other than the disabled-workflow rejection is returned unchanged.
pub async fn dispatch_workflow<A: WorkflowApi + ?Sized>(
    api: &A,
    slug: &RepositorySlug,
    workflow_id: u64,
    request: &DispatchRequest,
) -> Result<DispatchResult, ApiError> {
    let reply = match api.dispatch(slug, workflow_id, request).await {
        Ok(reply) => reply,
        Err(error) => {
            return match error.provider_message() {
                Some(message) if is_disabled_workflow_error(message) => Ok(DispatchResult::Disabled {
                    message: message.to_string(),
                }),
                _ => Err(error),
            };
        }
    };

    let outcome = outcome_from_reply(&reply);
    debug!(
        workflow_id,
        status = outcome.status.as_str(),
        has_run_url = outcome.workflow_run_url.is_some(),
        "dispatch reply classified"
    );
    if outcome.is_correlation_ready() {
        Ok(DispatchResult::Ready(outcome))
    } else {
        Ok(DispatchResult::Unconfirmed(outcome))
    }
}

/// The body's `status` wins over the HTTP status line; `workflow_url` names the run collection.
fn outcome_from_reply(reply: &DispatchReply) -> DispatchOutcome {
    let status = reply
        .body
        .get("status")
        .and_then(Value::as_str)
        .map(DispatchStatus::from_provider)
        .unwrap_or_else(|| DispatchStatus::Other(reply.http_status.clone()));
    let workflow_run_url = reply
        .body
        .get("workflow_url")
        .and_then(Value::as_str)
        .map(str::to_string);

    DispatchOutcome { status, workflow_run_url }
}
