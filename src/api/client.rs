use url::Url;

use crate::error::{CaseLawError, Result};

/// Raw response for one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Page-fetch capability consumed by the paginator and the decision downloader.
///
/// Implementations report network failures as [`CaseLawError::Transport`] and
/// return any HTTP response, successful or not, as a [`FetchedPage`].
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> Result<FetchedPage>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        (**self).fetch(url)
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        (**self).fetch(url)
    }
}

/// Fetch `url` and return its body, treating any non-success status as a
/// transport failure.
pub fn fetch_html<F: PageFetcher + ?Sized>(fetcher: &F, url: &Url) -> Result<String> {
    log::debug!("GET {}", url);
    let page = fetcher.fetch(url).map_err(|e| match e {
        CaseLawError::Network(err) => CaseLawError::transport(url.as_str(), None, err.to_string()),
        other => other,
    })?;
    if !page.is_success() {
        return Err(CaseLawError::transport(
            url.as_str(),
            Some(page.status),
            format!("bad status code {}", page.status),
        ));
    }
    Ok(page.body)
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds
    pub timeout: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: format!("nswcaselaw/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(FetchedPage);

    impl PageFetcher for Fixed {
        fn fetch(&self, _url: &Url) -> Result<FetchedPage> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_fetch_html_success() {
        let url = Url::parse("https://example.org/decision/abc").unwrap();
        let body = fetch_html(&Fixed(FetchedPage::ok("<html></html>")), &url).unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[test]
    fn test_fetch_html_bad_status() {
        let url = Url::parse("https://example.org/decision/abc").unwrap();
        let fetcher = Fixed(FetchedPage {
            status: 503,
            body: "unavailable".to_string(),
        });
        match fetch_html(&fetcher, &url) {
            Err(CaseLawError::Transport { url, status, page, .. }) => {
                assert_eq!(url, "https://example.org/decision/abc");
                assert_eq!(status, Some(503));
                assert_eq!(page, None);
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.starts_with("nswcaselaw/"));
    }
}
