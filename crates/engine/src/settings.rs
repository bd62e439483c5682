//! Validated settings for one dispatch invocation.

use wfd_types::{DispatchRequest, InvocationContext, RepositorySlug};

use crate::DispatchError;

/// Raw, caller-supplied values before validation.
#[derive(Debug, Clone, Default)]
pub struct DispatchArgs {
    /// Workflow name, numeric id or path suffix.
    pub workflow: String,
    pub git_ref: Option<String>,
    /// Target repository as `owner/repo`.
    pub repository: Option<String>,
    /// Workflow inputs as a JSON object.
    pub inputs: Option<String>,
}

/// Everything the orchestrator needs, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub workflow_reference: String,
    pub slug: RepositorySlug,
    pub request: DispatchRequest,
    /// Log the raw catalog payload once fetched.
    pub capture_catalog: bool,
}

impl DispatchSettings {
    /// Validate `args`, falling back to the invocation context for ref and repository.
    ///
    /// Performs no I/O; any error here is a configuration error.
    pub fn resolve(args: DispatchArgs, context: &InvocationContext) -> Result<Self, DispatchError> {
        let workflow_reference = args.workflow.trim().to_string();
        if workflow_reference.is_empty() {
            return Err(DispatchError::Configuration("a workflow name, id or filename is required".into()));
        }

        let slug = match non_blank(args.repository) {
            Some(raw) => raw
                .parse::<RepositorySlug>()
                .map_err(|error| DispatchError::Configuration(error.to_string()))?,
            None => context.repository.clone().ok_or_else(|| {
                DispatchError::Configuration("no repository given and the invocation context has none".into())
            })?,
        };

        let git_ref = non_blank(args.git_ref)
            .or_else(|| context.git_ref.clone())
            .ok_or_else(|| DispatchError::Configuration("no ref given and the invocation context has none".into()))?;

        let request = DispatchRequest::from_json_inputs(git_ref, args.inputs.as_deref().unwrap_or_default())?;

        Ok(Self {
            workflow_reference,
            slug,
            request,
            capture_catalog: false,
        })
    }

    pub fn with_catalog_capture(mut self, capture_catalog: bool) -> Self {
        self.capture_catalog = capture_catalog;
        self
    }

    pub fn git_ref(&self) -> &str {
        &self.request.git_ref
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> InvocationContext {
        InvocationContext {
            git_ref: Some("refs/heads/main".into()),
            repository: Some(RepositorySlug::new("octo", "hello")),
        }
    }

    fn args(workflow: &str) -> DispatchArgs {
        DispatchArgs {
            workflow: workflow.into(),
            ..Default::default()
        }
    }

    #[test]
    fn falls_back_to_invocation_context() {
        let settings = DispatchSettings::resolve(args("deploy.yml"), &context()).expect("settings");
        assert_eq!(settings.slug, RepositorySlug::new("octo", "hello"));
        assert_eq!(settings.git_ref(), "refs/heads/main");
        assert!(settings.request.inputs.is_empty());
        assert!(!settings.capture_catalog);
    }

    #[test]
    fn explicit_values_override_context() {
        let settings = DispatchSettings::resolve(
            DispatchArgs {
                workflow: " deploy ".into(),
                git_ref: Some("v1.2.0".into()),
                repository: Some("other/repo".into()),
                inputs: Some(r#"{"env":"staging"}"#.into()),
            },
            &context(),
        )
        .expect("settings");
        assert_eq!(settings.workflow_reference, "deploy");
        assert_eq!(settings.slug.to_string(), "other/repo");
        assert_eq!(settings.git_ref(), "v1.2.0");
        assert_eq!(settings.request.inputs.get("env").map(String::as_str), Some("staging"));
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let settings = DispatchSettings::resolve(
            DispatchArgs {
                workflow: "deploy".into(),
                git_ref: Some("  ".into()),
                repository: Some(String::new()),
                inputs: Some(String::new()),
            },
            &context(),
        )
        .expect("settings");
        assert_eq!(settings.git_ref(), "refs/heads/main");
        assert_eq!(settings.slug.repo, "hello");
    }

    #[test]
    fn configuration_errors() {
        let missing_workflow = DispatchSettings::resolve(args("  "), &context()).expect_err("blank workflow");
        assert!(missing_workflow.is_configuration());

        let bad_inputs = DispatchSettings::resolve(
            DispatchArgs {
                inputs: Some("{bad json".into()),
                ..args("deploy")
            },
            &context(),
        )
        .expect_err("bad inputs");
        assert!(matches!(bad_inputs, DispatchError::Inputs(_)));
        assert!(bad_inputs.is_configuration());

        let bad_repo = DispatchSettings::resolve(
            DispatchArgs {
                repository: Some("just-a-name".into()),
                ..args("deploy")
            },
            &context(),
        )
        .expect_err("bad repo");
        assert!(bad_repo.to_string().contains("owner/repo"));

        let no_context = DispatchSettings::resolve(args("deploy"), &InvocationContext::default()).expect_err("no context");
        assert!(no_context.is_configuration());
    }
}
