//! HTTP fetch for the source page.
//!
//! ### Behavior
//! - One GET per call, no retries.
//! - Redirects followed up to `max_redirects` (default 10, reqwest's default).
//! - Non-2xx status fails with `Error::HttpStatus { status, status_text }`.
//! - Transport failures (DNS, connect, reset, timeout) fail with `Error::Network`.
//! - Body returned as text with no size cap.
//! - No request timeout unless one is configured.

pub mod url;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header};
use std::time::{Duration, Instant};

pub use self::url::{UrlError, canonicalize};

use radar_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "radar/0.1")
    pub user_agent: String,

    /// Request timeout; transport default when `None`
    pub timeout: Option<Duration>,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "radar/0.1".to_string(), timeout: None, max_redirects: 10 }
    }
}

impl FetchConfig {
    /// Build from the application configuration.
    pub fn from_app(config: &radar_core::AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), ..Default::default() }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body decoded as text
    pub body: String,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Something that can produce the raw source page.
///
/// Implemented by [`SourcePage`] over HTTP; tests substitute static pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String, Error>;
}

/// HTTP fetch client.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL and return its body as text.
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = canonicalize(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| Error::Network(format!("network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "source page returned error status");
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("failed to read response: {}", e)))?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            fetch_ms,
            body.len()
        );

        Ok(FetchResponse { url, final_url, status, content_type, body, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

/// The fixed target page, fetched over HTTP.
#[derive(Debug, Clone)]
pub struct SourcePage {
    client: FetchClient,
    url: Url,
}

impl SourcePage {
    pub fn new(client: FetchClient, target_url: &str) -> Result<Self, Error> {
        let url = canonicalize(target_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PageSource for SourcePage {
    async fn fetch_page(&self) -> Result<String, Error> {
        Ok(self.client.fetch(self.url.as_str()).await?.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "radar/0.1");
        assert_eq!(config.timeout, None);
        assert_eq!(config.max_redirects, 10);
    }

    #[test]
    fn test_fetch_config_from_app() {
        let app = radar_core::AppConfig {
            user_agent: "radar-test".into(),
            timeout_ms: Some(2_000),
            ..Default::default()
        };
        let config = FetchConfig::from_app(&app);
        assert_eq!(config.user_agent, "radar-test");
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<script>const websites = [];</script>", "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let response = client.fetch(&server.uri()).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type.as_deref(), Some("text/html"));
        assert_eq!(response.body, "<script>const websites = [];</script>");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = client.fetch(&server.uri()).await;

        match result {
            Err(Error::HttpStatus { status, status_text }) => {
                assert_eq!(status, 503);
                assert_eq!(status_text, "Service Unavailable");
            }
            other => panic!("expected HttpStatus error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_follows_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let response = client.fetch(&format!("{}/old", server.uri())).await.unwrap();

        assert_eq!(response.body, "moved");
        assert_eq!(response.final_url.path(), "/new");
    }

    #[tokio::test]
    async fn test_fetch_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = client.fetch(&uri).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }

    #[tokio::test]
    async fn test_source_page_fetches_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/radar"))
            .respond_with(ResponseTemplate::new(200).set_body_string("page"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let source = SourcePage::new(client, &format!("{}/radar", server.uri())).unwrap();
        assert_eq!(source.fetch_page().await.unwrap(), "page");
    }

    #[test]
    fn test_source_page_rejects_bad_url() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = SourcePage::new(client, "file:///etc/passwd");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
