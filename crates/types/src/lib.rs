//! Shared types for the workflow dispatch crates.
//!
//! Everything here is plain data: the catalog entries returned by the provider,
//! the dispatch request body, the classified dispatch outcome and the run handle
//! produced by correlation. The invocation context carries the ambient defaults
//! (ref and repository) of the environment the tool runs in, so the engine never
//! has to read process state itself.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod workflow;

pub use workflow::{
    DispatchOutcome, DispatchRequest, DispatchStatus, InputsError, RunHandle, WorkflowCatalogPage, WorkflowDescriptor,
};

/// A repository addressed as `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySlug {
    pub owner: String,
    pub repo: String,
}

impl RepositorySlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Error returned when a repository string is not of the form `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("repository '{0}' is not of the form owner/repo")]
pub struct SlugParseError(pub String);

impl FromStr for RepositorySlug {
    type Err = SlugParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (owner, repo) = trimmed.split_once('/').ok_or_else(|| SlugParseError(trimmed.to_string()))?;
        let (owner, repo) = (owner.trim(), repo.trim());
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(SlugParseError(trimmed.to_string()));
        }
        Ok(Self::new(owner, repo))
    }
}

/// Ambient defaults of the invoking environment.
///
/// In a GitHub Actions job these come from `GITHUB_REF` and `GITHUB_REPOSITORY`;
/// the binary reads them once and hands the value to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub git_ref: Option<String>,
    pub repository: Option<RepositorySlug>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_repo() {
        let slug: RepositorySlug = "octo-org/hello-world".parse().expect("valid slug");
        assert_eq!(slug.owner, "octo-org");
        assert_eq!(slug.repo, "hello-world");
        assert_eq!(slug.to_string(), "octo-org/hello-world");
    }

    #[test]
    fn rejects_malformed_slugs() {
        for raw in ["", "owner", "owner/", "/repo", "a/b/c"] {
            assert!(raw.parse::<RepositorySlug>().is_err(), "expected '{raw}' to be rejected");
        }
    }
}
