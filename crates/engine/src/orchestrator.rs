//! Sequencing of one invocation: fetch → match → dispatch → correlate.

use tracing::info;
use wfd_api::WorkflowApi;
use wfd_types::{DispatchStatus, InvocationContext, RunHandle, WorkflowDescriptor};

use crate::catalog::fetch_catalog;
use crate::correlate::correlate_run;
use crate::dispatch::{DispatchResult, dispatch_workflow};
use crate::matcher::find_workflow;
use crate::settings::{DispatchArgs, DispatchSettings};
use crate::DispatchError;

/// Successful end states of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchReport {
    /// The trigger was accepted. `run` is present only when correlation succeeded.
    Dispatched {
        workflow: WorkflowDescriptor,
        status: DispatchStatus,
        run: Option<RunHandle>,
    },
    /// The provider refused because the workflow is disabled.
    Disabled { workflow: WorkflowDescriptor, message: String },
}

impl DispatchReport {
    pub fn workflow_id(&self) -> u64 {
        match self {
            Self::Dispatched { workflow, .. } | Self::Disabled { workflow, .. } => workflow.id,
        }
    }

    pub fn run(&self) -> Option<&RunHandle> {
        match self {
            Self::Dispatched { run, .. } => run.as_ref(),
            Self::Disabled { .. } => None,
        }
    }
}

/// Resolve raw arguments against the invocation context, then run the dispatch.
///
/// Configuration errors surface before any request is made.
pub async fn dispatch_from_args<A: WorkflowApi + ?Sized>(
    api: &A,
    args: DispatchArgs,
    context: &InvocationContext,
    capture_catalog: bool,
) -> Result<DispatchReport, DispatchError> {
    let settings = DispatchSettings::resolve(args, context)?.with_catalog_capture(capture_catalog);
    run_dispatch(api, &settings).await
}

/// Run one dispatch with validated settings.
pub async fn run_dispatch<A: WorkflowApi + ?Sized>(api: &A, settings: &DispatchSettings) -> Result<DispatchReport, DispatchError> {
    let slug = &settings.slug;
    let catalog = fetch_catalog(api, slug, settings.git_ref()).await?;
    info!(repository = %slug, workflow_count = catalog.workflows.len(), "fetched workflow catalog");
    if settings.capture_catalog {
        info!(payload = %catalog.raw_payload(), "workflow catalog payload");
    }

    let workflow = find_workflow(&catalog.workflows, &settings.workflow_reference)
        .cloned()
        .ok_or_else(|| DispatchError::WorkflowNotFound {
            owner: slug.owner.clone(),
            repo: slug.repo.clone(),
            reference: settings.workflow_reference.clone(),
        })?;
    info!(id = workflow.id, name = %workflow.name, path = %workflow.path, "found workflow");

    let outcome = match dispatch_workflow(api, slug, workflow.id, &settings.request).await? {
        DispatchResult::Disabled { message } => {
            info!(id = workflow.id, %message, "workflow is disabled; nothing was dispatched");
            return Ok(DispatchReport::Disabled { workflow, message });
        }
        DispatchResult::Unconfirmed(outcome) => {
            info!(
                status = outcome.status.as_str(),
                "dispatch accepted but not confirmed; no run id is available"
            );
            return Ok(DispatchReport::Dispatched {
                workflow,
                status: outcome.status,
                run: None,
            });
        }
        DispatchResult::Ready(outcome) => outcome,
    };

    let run = correlate_run(api, &outcome).await?;
    if let Some(run) = &run {
        info!(run_id = run.id, git_ref = %settings.git_ref(), "workflow run queued");
    }

    Ok(DispatchReport::Dispatched {
        workflow,
        status: outcome.status,
        run,
    })
}
