//! # Workflow dispatch engine
//!
//! Resolves a loosely specified workflow reference against the remote catalog,
//! triggers the workflow and correlates the run the trigger produced.
//!
//! ## Architecture
//!
//! - **`matcher`**: first-match lookup by name, numeric id or path suffix
//! - **`catalog`**: paginated catalog retrieval as a restartable page sequence
//! - **`dispatch`**: the trigger call and classification of its reply
//! - **`correlate`**: the follow-up read that turns a queued dispatch into a run id
//! - **`orchestrator`**: sequencing and the terminal/benign outcome mapping
//!
//! All remote access goes through [`wfd_api::WorkflowApi`], so every stage can be
//! exercised against an in-memory implementation.

pub mod catalog;
pub mod correlate;
pub mod dispatch;
mod error;
pub mod matcher;
pub mod orchestrator;
pub mod settings;

#[cfg(test)]
mod fake;

pub use catalog::{Catalog, CatalogPages, fetch_catalog};
pub use correlate::correlate_run;
pub use dispatch::{DISABLED_WORKFLOW_SUFFIX, DispatchResult, dispatch_workflow, is_disabled_workflow_error};
pub use error::DispatchError;
pub use matcher::find_workflow;
pub use orchestrator::{DispatchReport, dispatch_from_args, run_dispatch};
pub use settings::{DispatchArgs, DispatchSettings};
