//! GitHub Actions API client utilities.
//!
//! This module provides a lightweight client for the three Actions endpoints
//! the dispatcher needs. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Validating the API base URL for safety
//! - Building requests with a consistent User-Agent, Accept and API-version headers
//! - Refusing to send credentials to hosts other than the configured API host
//!
//! The primary entry point is [`GithubClient`]. Create an instance via
//! [`GithubClient::new`]; the engine talks to it through the [`WorkflowApi`] trait.
//!
//! # Example
//!
//! ```ignore
//! use wfd_api::{ClientConfig, GithubClient, WorkflowApi};
//! use wfd_types::RepositorySlug;
//!
//! async fn first_page() -> Result<(), wfd_api::ApiError> {
//!     let client = GithubClient::new(ClientConfig::new("https://api.github.com", "ghp_example"))?;
//!     let slug = RepositorySlug::new("octo-org", "octo-repo");
//!     let page = client.list_workflows_page(&slug, "main", None).await?;
//!     println!("{} workflows", page.workflows.len());
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url, header};
use tracing::debug;

mod error;
mod workflows;

pub use error::ApiError;
pub use workflows::{CatalogPage, DispatchReply, WorkflowApi};

/// Public API endpoint used when no base URL is configured.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// REST API version pinned on every request.
pub const API_VERSION: &str = "2022-11-28";
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Settings for constructing a [`GithubClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for GitHub API access.
///
/// The client pre-configures default headers and builds requests against a
/// validated base URL.
pub struct GithubClient {
    base_url: Url,
    http: Client,
    user_agent: String,
}

impl GithubClient {
    /// Construct a [`GithubClient`] from a base URL and bearer token.
    ///
    /// Non-localhost hosts must use HTTPS. A blank token is rejected since
    /// every endpoint used here requires authentication.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = validate_base_url(&config.base_url)?;
        if config.token.trim().is_empty() {
            return Err(ApiError::Client("a token is required to call the Actions API".into()));
        }

        let mut default_headers = header::HeaderMap::new();
        let mut authorization = header::HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
            .map_err(|_| ApiError::Client("token contains characters that are not valid in a header".into()))?;
        authorization.set_sensitive(true);
        default_headers.insert(header::AUTHORIZATION, authorization);
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/vnd.github+json"));
        default_headers.insert("x-github-api-version", header::HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout)
            .build()
            .map_err(|error| ApiError::Client(format!("build http client: {error}")))?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("workflow-dispatch/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Base URL every API-relative path is resolved against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url(), path);
        debug!(%url, "building request");
        self.request_url(method, &url)
    }

    fn request_url(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }

    /// Resolve a URL handed back by the provider (pagination links, run URLs).
    ///
    /// Relative references are joined onto the base URL. Absolute URLs must point
    /// at the same scheme, host and port as the base URL, since the default
    /// headers carry the bearer token.
    pub fn resolve_provider_url(&self, raw: &str) -> Result<Url, ApiError> {
        let raw = raw.trim();
        let resolved = match Url::parse(raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .join(raw)
                .map_err(|error| ApiError::Url(format!("invalid URL '{raw}': {error}")))?,
            Err(error) => return Err(ApiError::Url(format!("invalid URL '{raw}': {error}"))),
        };

        let same_origin = resolved.scheme() == self.base_url.scheme()
            && resolved.host_str() == self.base_url.host_str()
            && resolved.port_or_known_default() == self.base_url.port_or_known_default();
        if !same_origin {
            return Err(ApiError::Url(format!(
                "refusing to follow '{}': host does not match the API base '{}'",
                resolved,
                self.base_url()
            )));
        }
        Ok(resolved)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS (GitHub Enterprise hosts are allowed)
fn validate_base_url(base: &str) -> Result<Url, ApiError> {
    let parsed_base_url =
        Url::parse(base.trim()).map_err(|error| ApiError::Url(format!("invalid API base URL '{}': {}", base, error)))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| ApiError::Url(format!("API base URL '{}' must include a host", base)))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(parsed_base_url);
    }

    if parsed_base_url.scheme() != "https" {
        return Err(ApiError::Url(format!(
            "API base URL must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        )));
    }

    Ok(parsed_base_url)
}
