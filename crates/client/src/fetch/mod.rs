//! HTTP fetch of site content.
//!
//! One GET per URL. Only `200 OK` counts as success; every other status,
//! transport error or unreadable body fails with the URL and the cause.
//!
//! - Request timeout: 500ms (configurable)
//! - Max redirects: 5

use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};

use sitesnap_core::{AppConfig, Error, SiteFetcher};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "sitesnap/0.1")
    pub user_agent: String,

    /// Request timeout (default: 500ms)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "sitesnap/0.1".to_string(), timeout: Duration::from_millis(500), max_redirects: 5 }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.fetch_timeout(), ..Default::default() }
    }
}

/// HTTP client that downloads page bodies.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Fetch `url` and return its body as text.
    pub async fn get_data(&self, url: &str) -> Result<String, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch_failed(url, format!("failed to make request: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::fetch_failed(url, format!("status code {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::fetch_failed(url, format!("failed to read body response: {e}")))?;

        tracing::debug!(url, elapsed_ms = start.elapsed().as_millis() as u64, bytes = body.len(), "fetched");

        Ok(body)
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl SiteFetcher for FetchClient {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        self.get_data(url).await
    }
}
