use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

use super::client::{ClientConfig, FetchedPage, PageFetcher};
use crate::error::{CaseLawError, Result};

/// Blocking HTTP implementation of [`PageFetcher`]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured timeout and user agent
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .use_rustls_tls()
            .build()?;

        Ok(Self { client })
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| CaseLawError::transport(url.as_str(), None, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| CaseLawError::transport(url.as_str(), Some(status), e.to_string()))?;

        Ok(FetchedPage { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fetch_html;

    #[test]
    fn test_http_fetcher_creation() {
        let fetcher = HttpFetcher::new(&ClientConfig::default());
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_fetch_returns_status_and_body() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/decision/abc123")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><title>A v B</title></html>")
            .create();

        let fetcher = HttpFetcher::new(&ClientConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/decision/abc123", server.url())).unwrap();
        let page = fetcher.fetch(&url).unwrap();
        assert_eq!(page.status, 200);
        assert!(page.body.contains("A v B"));
    }

    #[test]
    fn test_non_success_status_is_transport_error() {
        let mut server = mockito::Server::new();
        let _m = server.mock("GET", "/decision/missing").with_status(404).create();

        let fetcher = HttpFetcher::new(&ClientConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/decision/missing", server.url())).unwrap();
        let result = fetch_html(&fetcher, &url);
        assert!(matches!(
            result,
            Err(CaseLawError::Transport { status: Some(404), .. })
        ));
    }
}
