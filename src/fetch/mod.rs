use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::FailureReason;

/// Default cross-origin relay; the target URL is appended url-encoded
pub const DEFAULT_RELAY_PREFIX: &str = "https://corsproxy.io/?";

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl From<FetchError> for FailureReason {
    fn from(err: FetchError) -> Self {
        FailureReason::UpstreamUnreachable(err.to_string())
    }
}

/// Fetch the raw body behind a URL.
///
/// Acquisition logic only sees this capability, so the relay can be swapped
/// or removed without touching it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Build the shared HTTP client from config
pub fn build_client(config: &HttpConfig) -> crate::Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()?;

    Ok(client)
}

/// Plain GET, no relay
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching {}", url);

        let network = |source| FetchError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(network)
    }
}

/// Routes every request through a relay that takes the target URL as its query
pub struct RelayFetcher {
    prefix: String,
    inner: Arc<dyn PageFetcher>,
}

impl RelayFetcher {
    pub fn new(prefix: impl Into<String>, inner: Arc<dyn PageFetcher>) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    pub fn relay_url(&self, target: &str) -> String {
        format!("{}{}", self.prefix, urlencoding::encode(target))
    }
}

#[async_trait]
impl PageFetcher for RelayFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.inner.fetch(&self.relay_url(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_relay_wraps_target_url() {
        let mut inner = MockPageFetcher::new();
        inner
            .expect_fetch()
            .withf(|url| {
                url.starts_with(DEFAULT_RELAY_PREFIX)
                    && url.ends_with("https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc")
            })
            .times(1)
            .returning(|_| Ok("<html></html>".to_string()));

        let relay = RelayFetcher::new(DEFAULT_RELAY_PREFIX, Arc::new(inner));
        let body = relay.fetch("https://www.youtube.com/watch?v=abc").await.unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_http_fetcher_rejects_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(503)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(Client::new());
        let err = fetcher
            .fetch(&format!("{}/page", server.url()))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert!(matches!(
            FailureReason::from(err),
            FailureReason::UpstreamUnreachable(_)
        ));
    }

    #[tokio::test]
    async fn test_http_fetcher_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("hello")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(Client::new());
        let body = fetcher.fetch(&format!("{}/page", server.url())).await.unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let fetcher = HttpFetcher::new(Client::new());
        let err = fetcher.fetch("http://127.0.0.1:1/nothing").await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
    }
}
