use thiserror::Error;
use wfd_api::ApiError;
use wfd_types::InputsError;

/// Terminal failures of a dispatch invocation.
///
/// `Configuration` and `Inputs` are raised before any network call. The benign
/// outcomes (disabled workflow, unconfirmed dispatch) are not errors; they are
/// reported through [`crate::DispatchReport`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid inputs: {0}")]
    Inputs(#[from] InputsError),

    #[error("Unable to find workflow '{reference}' in {owner}/{repo}")]
    WorkflowNotFound { owner: String, repo: String, reference: String },

    #[error("run record at {url} carries no run id")]
    MissingRunId { url: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl DispatchError {
    /// True for failures caused by caller-supplied configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Inputs(_))
    }
}
