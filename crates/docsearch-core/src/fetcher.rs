//! HTTP fetching for `llms.txt` indices and the markdown documents they
//! reference (spec §4.5, §6).
//!
//! A single, stateless GET per URL — no conditional requests, no local
//! cache. The important property is the outgoing request looking like a
//! browser so sites that reject obvious bot traffic still serve us.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("docsearch/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over a configured [`reqwest::Client`].
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher with a 30-second timeout and browser-like headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the underlying client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Builds a fetcher with a custom timeout, primarily for tests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the underlying client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::from)?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns its body as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] on a non-2xx response or transport failure.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Network(format!(
                "GET {url} returned {status}",
                status = status_label(status)
            )));
        }

        let content = response.text().await?;
        info!(%url, bytes = content.len(), "fetched");
        Ok(content)
    }
}

fn status_label(status: StatusCode) -> String {
    format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn fetches_successful_response_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/llms.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello world"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let body = fetcher
            .fetch(&format!("{}/llms.txt", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "hello world");
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let result = fetcher.fetch(&format!("{}/missing.txt", server.uri())).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }

    #[tokio::test]
    async fn request_carries_a_user_agent_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua.txt"))
            .and(wiremock::matchers::header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let body = fetcher.fetch(&format!("{}/ua.txt", server.uri())).await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn times_out_on_a_slow_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow.txt"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let fetcher = Fetcher::with_timeout(Duration::from_millis(50)).unwrap();
        let result = fetcher.fetch(&format!("{}/slow.txt", server.uri())).await;
        assert!(result.is_err());
    }
}
