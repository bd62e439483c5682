//! Paginated retrieval of the workflow catalog.
//!
//! Pages are exposed as a finite, restartable lazy sequence ([`CatalogPages`]).
//! Later pages are only discoverable from the continuation link of the page
//! before them, so they are fetched strictly in order. [`fetch_catalog`] drains
//! the sequence and is what callers normally use.

use serde_json::Value;
use wfd_api::{ApiError, CatalogPage, WorkflowApi};
use wfd_types::{RepositorySlug, WorkflowDescriptor};

/// The complete catalog for one repository and ref.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Every workflow, in provider order across pages.
    pub workflows: Vec<WorkflowDescriptor>,
    /// Raw page payloads, kept for optional diagnostic capture.
    pub raw_pages: Vec<Value>,
}

impl Catalog {
    /// The raw payload as a single JSON array of pages.
    pub fn raw_payload(&self) -> Value {
        Value::Array(self.raw_pages.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageCursor {
    Start,
    Next(String),
    Exhausted,
}

/// Lazy sequence of catalog pages.
pub struct CatalogPages<'a, A: WorkflowApi + ?Sized> {
    api: &'a A,
    slug: &'a RepositorySlug,
    git_ref: &'a str,
    cursor: PageCursor,
    pages_fetched: usize,
}

impl<'a, A: WorkflowApi + ?Sized> CatalogPages<'a, A> {
    pub fn new(api: &'a A, slug: &'a RepositorySlug, git_ref: &'a str) -> Self {
        Self {
            api,
            slug,
            git_ref,
            cursor: PageCursor::Start,
            pages_fetched: 0,
        }
    }

    /// Fetch the next page, or `None` once the provider reported no further pages.
    ///
    /// A failed fetch leaves the cursor where it was.
    pub async fn next_page(&mut self) -> Result<Option<CatalogPage>, ApiError> {
        let cursor = match &self.cursor {
            PageCursor::Exhausted => return Ok(None),
            PageCursor::Start => None,
            PageCursor::Next(link) => Some(link.as_str()),
        };

        let page = self.api.list_workflows_page(self.slug, self.git_ref, cursor).await?;
        self.pages_fetched += 1;
        self.cursor = match &page.next {
            Some(link) => PageCursor::Next(link.clone()),
            None => PageCursor::Exhausted,
        };
        Ok(Some(page))
    }

    /// Rewind to the first page.
    pub fn restart(&mut self) {
        self.cursor = PageCursor::Start;
        self.pages_fetched = 0;
    }

    /// Number of pages fetched since construction or the last restart.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

/// Fetch every catalog page for `slug` at `git_ref`, concatenated in provider order.
///
/// Failures are returned as-is; nothing is retried here.
pub async fn fetch_catalog<A: WorkflowApi + ?Sized>(api: &A, slug: &RepositorySlug, git_ref: &str) -> Result<Catalog, ApiError> {
    let mut pages = CatalogPages::new(api, slug, git_ref);
    let mut catalog = Catalog::default();
    while let Some(page) = pages.next_page().await? {
        catalog.workflows.extend(page.workflows);
        catalog.raw_pages.push(page.raw);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeApi};

    fn slug() -> RepositorySlug {
        RepositorySlug::new("octo", "hello")
    }

    fn page(ids: &[u64]) -> Vec<WorkflowDescriptor> {
        ids.iter()
            .map(|id| WorkflowDescriptor::new(*id, format!("wf-{id}"), format!(".github/workflows/wf-{id}.yml")))
            .collect()
    }

    #[tokio::test]
    async fn concatenates_pages_in_order_with_one_request_per_page() {
        let api = FakeApi::new(vec![page(&[1, 2]), page(&[3]), page(&[4, 5])]);

        let catalog = fetch_catalog(&api, &slug(), "main").await.expect("catalog");

        let ids: Vec<u64> = catalog.workflows.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(catalog.raw_pages.len(), 3);
        assert_eq!(
            api.calls(),
            vec![
                Call::ListPage { cursor: None },
                Call::ListPage {
                    cursor: Some("page:1".into())
                },
                Call::ListPage {
                    cursor: Some("page:2".into())
                },
            ]
        );
    }

    #[tokio::test]
    async fn single_empty_page_is_one_request() {
        let api = FakeApi::new(vec![Vec::new()]);
        let catalog = fetch_catalog(&api, &slug(), "main").await.expect("catalog");
        assert!(catalog.workflows.is_empty());
        assert_eq!(api.calls().len(), 1);
        assert_eq!(catalog.raw_payload().as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn sequence_ends_and_can_restart() {
        let api = FakeApi::new(vec![page(&[1]), page(&[2])]);
        let slug = slug();
        let mut pages = CatalogPages::new(&api, &slug, "main");

        assert!(pages.next_page().await.expect("page 1").is_some());
        assert!(pages.next_page().await.expect("page 2").is_some());
        assert!(pages.next_page().await.expect("end").is_none());
        assert_eq!(pages.pages_fetched(), 2);
        assert_eq!(api.calls().len(), 2, "exhausted sequence must not issue requests");

        pages.restart();
        let first = pages.next_page().await.expect("restarted").expect("first page");
        assert_eq!(first.workflows[0].id, 1);
        assert_eq!(pages.pages_fetched(), 1);
    }
}
