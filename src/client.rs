//! NationBuilder API client.
//!
//! Low-level HTTP client that builds URLs, attaches the access token and
//! page limit, and hands back raw responses. Resource-specific operations
//! live on [`Resource`](crate::Resource) and [`Nation`](crate::Nation).

use std::sync::Arc;

use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

use crate::error::{NbError, Result};
use crate::response::ApiResponse;

/// Page size sent with every request unless overridden.
pub const DEFAULT_PAGE_LIMIT: u32 = 1000;

const API_PREFIX: &str = "api/v1/";
const USER_AGENT: &str = concat!("nbee/", env!("CARGO_PKG_VERSION"));

/// Low-level NationBuilder API client.
///
/// Every request carries `limit` and `access_token` query parameters. The
/// response is returned whatever its status code; transport failures are
/// the only errors produced here.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use nbee::NationBuilderClient;
///
/// # async fn example() -> nbee::Result<()> {
/// let client = NationBuilderClient::new("my-nation", "api-key")?;
/// let response = client.get("people").await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NationBuilderClient {
    http: Client,
    origin: Arc<str>,
    base_url: Arc<Url>,
    slug: String,
    token: String,
    page_limit: u32,
}

impl std::fmt::Debug for NationBuilderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NationBuilderClient")
            .field("slug", &self.slug)
            .field("base_url", &self.base_url.as_str())
            .field("page_limit", &self.page_limit)
            .finish_non_exhaustive()
    }
}

impl NationBuilderClient {
    /// Create a client for the nation at `https://{slug}.nationbuilder.com`.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug does not form a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(slug: &str, token: &str) -> Result<Self> {
        let origin = format!("https://{slug}.nationbuilder.com");
        Self::with_origin(slug, token, &origin)
    }

    /// Create a client against an explicit origin (scheme and host).
    ///
    /// Used for proxies and for pointing the client at a mock server.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is not a valid URL.
    pub fn with_origin(slug: &str, token: &str, origin: &str) -> Result<Self> {
        let origin = origin.trim_end_matches('/');
        let base_url = Url::parse(&format!("{origin}/{API_PREFIX}"))?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(NbError::Http)?;

        Ok(Self {
            http,
            origin: Arc::from(origin),
            base_url: Arc::new(base_url),
            slug: slug.to_string(),
            token: token.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Override the page size requested on every call.
    #[must_use]
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// The nation slug.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Scheme and host, without a trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The API base URL (`{origin}/api/v1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Issue one request against a path under the API base.
    ///
    /// `query` is sent alongside the fixed `limit`/`access_token` pair and
    /// `body`, when present, is sent as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not join onto the base URL or the
    /// transport fails. Non-2xx statuses are returned as responses.
    #[tracing::instrument(skip(self, query, body), fields(slug = %self.slug))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = self.endpoint_url(path)?;
        self.send(method, url, query, body).await
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path, &[], None).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        self.request(Method::GET, path, query, None).await
    }

    /// Make a POST request, with an optional JSON body.
    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.request(Method::POST, path, &[], body).await
    }

    /// Make a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, &[], None).await
    }

    /// Follow a pagination reference such as `/api/v1/people?__nonce=..&__token=..`.
    ///
    /// The reference is appended to the origin and the fixed
    /// `limit`/`access_token` suffix is added.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference does not form a valid URL or the
    /// transport fails.
    #[tracing::instrument(skip(self), fields(slug = %self.slug))]
    pub async fn fetch_next(&self, reference: &str) -> Result<ApiResponse> {
        let url = Url::parse(&format!("{}{}", self.origin, reference))?;
        self.send(Method::GET, url, &[], None).await
    }

    /// GET an arbitrary URL without the auth suffix.
    ///
    /// A bare `host/path` is treated as `https://host/path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport fails.
    #[tracing::instrument(skip(self))]
    pub async fn get_absolute(&self, url: &str) -> Result<ApiResponse> {
        let url = if url.contains("://") {
            Url::parse(url)?
        } else {
            Url::parse(&format!("https://{url}"))?
        };

        let response = self.http.get(url).send().await.map_err(NbError::Http)?;
        ApiResponse::read(response).await
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let limit = self.page_limit.to_string();
        let auth = [("limit", limit.as_str()), ("access_token", self.token.as_str())];

        let mut builder = self.http.request(method, url).query(query).query(&auth);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(NbError::Http)?;
        let response = ApiResponse::read(response).await?;
        tracing::debug!(status = response.status().as_u16(), "response received");
        Ok(response)
    }
}
