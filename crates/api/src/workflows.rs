//! Actions workflow endpoints: list, dispatch and run lookup.

use std::time::Instant;

use reqwest::header::HeaderMap;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use wfd_types::{DispatchRequest, RepositorySlug, WorkflowCatalogPage, WorkflowDescriptor};
use wfd_util::http::{decode_error, parse_response_json_strict, provider_error_message, status_error_message};
use wfd_util::{encode_path_segment, next_page_link, redact_sensitive};

use crate::{ApiError, GithubClient};

/// Page size requested from the catalog endpoint.
const CATALOG_PAGE_SIZE: &str = "100";

/// One page of the workflow catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub workflows: Vec<WorkflowDescriptor>,
    /// The page exactly as the provider returned it.
    pub raw: Value,
    /// Continuation link to the following page, absent on the last page.
    pub next: Option<String>,
}

/// Synchronous reply to a dispatch call.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReply {
    /// HTTP status line, e.g. `204 No Content`.
    pub http_status: String,
    /// Decoded response body, `Value::Null` when the provider sent none.
    pub body: Value,
}

/// Remote operations the dispatcher depends on.
#[async_trait::async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Fetch one catalog page. `cursor` is `None` for the first page and the
    /// previous page's continuation link afterwards.
    async fn list_workflows_page(
        &self,
        slug: &RepositorySlug,
        git_ref: &str,
        cursor: Option<&str>,
    ) -> Result<CatalogPage, ApiError>;

    /// Trigger a workflow run.
    async fn dispatch(&self, slug: &RepositorySlug, workflow_id: u64, request: &DispatchRequest) -> Result<DispatchReply, ApiError>;

    /// Read a run or run collection by the URL the dispatch reply carried.
    async fn get_run(&self, url: &str) -> Result<Value, ApiError>;
}

struct JsonResponse {
    status: StatusCode,
    headers: HeaderMap,
    text: String,
    payload: Value,
}

#[async_trait::async_trait]
impl WorkflowApi for GithubClient {
    async fn list_workflows_page(
        &self,
        slug: &RepositorySlug,
        git_ref: &str,
        cursor: Option<&str>,
    ) -> Result<CatalogPage, ApiError> {
        let builder = match cursor {
            None => self
                .request(Method::GET, &workflows_path(slug))
                .query(&[("per_page", CATALOG_PAGE_SIZE), ("ref", git_ref)]),
            Some(link) => {
                let url = self.resolve_provider_url(link)?;
                self.request_url(Method::GET, url.as_str())
            }
        };

        let response = send_json(builder, &Method::GET, "list workflows").await?;
        let page: WorkflowCatalogPage = serde_json::from_value(response.payload.clone())
            .map_err(|error| decode_error(&response.text, Some(response.status), error))?;
        let next = next_page_link(&response.headers);
        debug!(
            workflow_count = page.workflows.len(),
            total_count = page.total_count,
            has_next = next.is_some(),
            "catalog page received"
        );

        Ok(CatalogPage {
            workflows: page.workflows,
            raw: response.payload,
            next,
        })
    }

    async fn dispatch(&self, slug: &RepositorySlug, workflow_id: u64, request: &DispatchRequest) -> Result<DispatchReply, ApiError> {
        let path = format!("{}/{}/dispatches", workflows_path(slug), workflow_id);
        let builder = self.request(Method::POST, &path).json(request);
        debug!(workflow_id, git_ref = %request.git_ref, input_count = request.inputs.len(), "dispatch body prepared");

        let response = send_json(builder, &Method::POST, "dispatch workflow").await?;
        Ok(DispatchReply {
            http_status: response.status.to_string(),
            body: response.payload,
        })
    }

    async fn get_run(&self, url: &str) -> Result<Value, ApiError> {
        let url = self.resolve_provider_url(url)?;
        let builder = self.request_url(Method::GET, url.as_str());
        let response = send_json(builder, &Method::GET, "read workflow run").await?;
        Ok(response.payload)
    }
}

fn workflows_path(slug: &RepositorySlug) -> String {
    format!(
        "/repos/{}/{}/actions/workflows",
        encode_path_segment(&slug.owner),
        encode_path_segment(&slug.repo)
    )
}

/// Send a request and decode its JSON body.
///
/// Non-success statuses become [`ApiError::Status`] carrying the provider's
/// error message; empty bodies decode to `Value::Null`.
async fn send_json(builder: RequestBuilder, method: &Method, operation: &str) -> Result<JsonResponse, ApiError> {
    let start = Instant::now();
    debug!(method = %method, operation, "http request started");

    let response = builder.send().await.map_err(|error| {
        warn!(
            method = %method,
            operation,
            error = %redact_sensitive(&error.to_string()),
            duration_ms = start.elapsed().as_millis(),
            "http request failed to send"
        );
        ApiError::Network(error)
    })?;
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await?;

    if !status.is_success() {
        let message = provider_error_message(&text)
            .or_else(|| status_error_message(status.as_u16()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        warn!(
            method = %method,
            operation,
            status = %status,
            message = %redact_sensitive(&message),
            duration_ms = start.elapsed().as_millis(),
            "http request failed"
        );
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let payload = if text.trim().is_empty() {
        Value::Null
    } else {
        parse_response_json_strict(&text, Some(status)).inspect_err(|error| {
            warn!(
                method = %method,
                operation,
                status = %status,
                body_len = text.len(),
                error = %error,
                "http response JSON parse failed"
            );
        })?
    };
    debug!(
        method = %method,
        operation,
        status = %status,
        duration_ms = start.elapsed().as_millis(),
        "http request completed"
    );

    Ok(JsonResponse {
        status,
        headers,
        text,
        payload,
    })
}
