//! Identifier matching against the workflow catalog.

use wfd_types::WorkflowDescriptor;

/// Find the first catalog entry the reference identifies.
///
/// A candidate matches when the reference equals its name, equals its numeric
/// id, or is a suffix of its path (so both `deploy.yml` and
/// `.github/workflows/deploy.yml` work). Catalog order decides ties.
pub fn find_workflow<'a>(catalog: &'a [WorkflowDescriptor], reference: &str) -> Option<&'a WorkflowDescriptor> {
    catalog.iter().find(|workflow| matches_reference(workflow, reference))
}

pub fn matches_reference(workflow: &WorkflowDescriptor, reference: &str) -> bool {
    workflow.name == reference || workflow.id.to_string() == reference || workflow.path.ends_with(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<WorkflowDescriptor> {
        vec![
            WorkflowDescriptor::new(1, "build", ".github/workflows/build.yml"),
            WorkflowDescriptor::new(2, "deploy", ".github/workflows/deploy.yml"),
            WorkflowDescriptor::new(30, "Release 2", ".github/workflows/release.yaml"),
        ]
    }

    #[test]
    fn matches_by_name() {
        assert_eq!(find_workflow(&catalog(), "deploy").map(|w| w.id), Some(2));
        assert_eq!(find_workflow(&catalog(), "Release 2").map(|w| w.id), Some(30));
    }

    #[test]
    fn matches_by_numeric_id() {
        assert_eq!(find_workflow(&catalog(), "30").map(|w| w.id), Some(30));
        assert!(find_workflow(&catalog(), "3").is_none(), "ids must match exactly");
    }

    #[test]
    fn matches_by_path_suffix() {
        assert_eq!(find_workflow(&catalog(), "deploy.yml").map(|w| w.id), Some(2));
        assert_eq!(find_workflow(&catalog(), ".github/workflows/release.yaml").map(|w| w.id), Some(30));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(find_workflow(&catalog(), "Deploy").is_none());
    }

    #[test]
    fn first_match_in_catalog_order_wins() {
        let mut duplicated = catalog();
        duplicated.push(WorkflowDescriptor::new(99, "build", ".github/workflows/build-again.yml"));
        assert_eq!(find_workflow(&duplicated, "build").map(|w| w.id), Some(1));

        // An earlier path-suffix match beats a later exact name match.
        let ordered = vec![
            WorkflowDescriptor::new(5, "nightly", ".github/workflows/deploy"),
            WorkflowDescriptor::new(6, "deploy", ".github/workflows/other.yml"),
        ];
        assert_eq!(find_workflow(&ordered, "deploy").map(|w| w.id), Some(5));
    }

    #[test]
    fn no_match_is_none() {
        assert!(find_workflow(&catalog(), "nonexistent").is_none());
        assert!(find_workflow(&[], "build").is_none());
    }
}
