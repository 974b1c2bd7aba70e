//! HTTP fetcher backed by reqwest.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

use pagevault_core::{AppConfig, Error, Fetcher};

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "pagevault/0.1")
    pub user_agent: String,

    /// Per-attempt request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "pagevault/0.1".to_string(),
            timeout: Duration::from_millis(20_000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), ..Default::default() }
    }
}

/// One-attempt HTTP GET client implementing the core `Fetcher` trait.
///
/// Retries, backoff, and concurrency bounding all happen in the gateway;
/// this type only knows how to perform a single request.
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
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

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<Bytes, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::ReadFailure(format!("failed to read response body: {e}")))?;

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "pagevault/0.1");
        assert_eq!(config.timeout, Duration::from_millis(20_000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "custom/1.0".into(), timeout_ms: 5_000, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "custom/1.0");
        assert_eq!(config.timeout, Duration::from_millis(5_000));
        assert_eq!(config.max_redirects, 5);
    }

    #[tokio::test]
    async fn test_fetcher_new() {
        let fetcher = HttpFetcher::new(FetchConfig::default());
        assert!(fetcher.is_ok());
    }
}
