pub mod client;
pub mod http_client;

pub use client::{fetch_html, ClientConfig, FetchedPage, PageFetcher};
pub use http_client::HttpFetcher;

/// Public site the client talks to
pub const CASELAW_BASE_URL: &str = "https://www.caselaw.nsw.gov.au";

/// Path of the advanced search form, relative to the base URL
pub const SEARCH_PATH: &str = "/search/advanced";
