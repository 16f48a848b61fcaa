//! HTTP fetcher implementation
//!
//! This module handles all outbound HTTP requests, including:
//! - Building HTTP clients with the configured user agent, timeouts and proxy
//! - GET requests returning status, content type and raw body bytes
//! - Page fetches that additionally extract anchor and image references
//! - Error classification into transport failures

use crate::config::FetcherConfig;
use crate::crawler::parser::parse_html;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Proxy};
use url::Url;

/// A completed HTTP exchange
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value (empty if absent)
    pub content_type: String,
    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// A fetched document with its outbound references resolved to absolute URLs
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// HTTP status code
    pub status_code: u16,
    /// Absolute URLs of every `<a href>` in document order
    pub links: Vec<String>,
    /// Absolute URLs of every `<img src>` in document order
    pub images: Vec<String>,
}

/// Capability to retrieve remote resources
///
/// Implementations must be shareable across tasks; the scrape server calls a
/// single instance from many concurrent requests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and returns the raw response
    ///
    /// Any HTTP response, whatever its status, is `Ok`. Only failures to
    /// obtain a response at all are reported as `FetchError::Transport`.
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError>;

    /// Fetches an HTML page and extracts its anchor and image references
    ///
    /// Non-2xx responses are returned with their status and no references,
    /// since the body of an error page carries no links worth following.
    async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self.fetch(url).await?;

        if !response.is_success() {
            return Ok(FetchedPage {
                status_code: response.status_code,
                ..FetchedPage::default()
            });
        }

        let html = String::from_utf8_lossy(&response.body);
        let parsed = parse_html(&html, &response.final_url);

        Ok(FetchedPage {
            status_code: response.status_code,
            links: parsed.links,
            images: parsed.images,
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. unsupported proxy scheme)
///
/// # Example
///
/// ```no_run
/// use gallery_harvester::config::FetcherConfig;
/// use gallery_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        tracing::info!("Routing outbound requests through proxy {}", proxy);
        builder = builder.proxy(Proxy::all(proxy.as_str())?);
    }

    builder.build()
}

/// reqwest-backed `Fetcher`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?
            .to_vec();

        Ok(FetchResponse {
            final_url,
            status_code,
            content_type,
            body,
        })
    }
}

/// Converts a reqwest failure into a transport error with a short description
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else {
        error.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}
