//! Bulk downloads: reading decision references back out of a CSV and
//! fetching, parsing and saving decisions one at a time.

use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::api::PageFetcher;
use crate::decision::{fetch_decision, DecisionParser, ParsedDecision};
use crate::error::{CaseLawError, Result};
use crate::output;
use crate::search::{ResultStub, Sleeper};

/// Every decision reference found in a CSV file, in file order
pub fn load_uris_from_csv(path: &Path, base_url: &Url) -> Result<Vec<String>> {
    let file = File::open(path)?;
    uris_from_reader(file, base_url)
}

/// Every cell that is an absolute decision URL on `base_url` or a bare
/// `/decision/<hex>` reference yields that reference.
pub fn uris_from_reader<R: Read>(reader: R, base_url: &Url) -> Result<Vec<String>> {
    let base = regex::escape(base_url.as_str().trim_end_matches('/'));
    let pattern = Regex::new(&format!(r"^\s*(?:{})?(/decision/[0-9a-fA-F]+)", base))
        .map_err(|e| CaseLawError::InvalidInput(format!("bad base URL pattern: {}", e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut uris = Vec::new();
    for record in reader.records() {
        let record = record?;
        for cell in record.iter() {
            if let Some(m) = pattern.captures(cell).and_then(|c| c.get(1)) {
                uris.push(m.as_str().to_string());
            }
        }
    }
    log::info!("Found {} decision reference(s)", uris.len());
    Ok(uris)
}

/// Where downloaded decisions go
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Directory for `<id>.json` files
    pub download_dir: PathBuf,
    /// Directory for the raw `<id>.html`, when wanted
    pub dump_dir: Option<PathBuf>,
    /// Wait between successive decision fetches
    pub pause: Duration,
}

/// Counts for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub failed: usize,
    pub malformed_fields: usize,
}

/// Fetches decisions one after another, pausing between fetches
pub struct Downloader<'a, F: PageFetcher + ?Sized, S: Sleeper> {
    fetcher: &'a F,
    sleeper: S,
    base_url: Url,
    options: DownloadOptions,
    parser: DecisionParser,
    fetched: usize,
    pause_first: bool,
    summary: DownloadSummary,
}

impl<'a, F: PageFetcher + ?Sized, S: Sleeper> Downloader<'a, F, S> {
    pub fn new(fetcher: &'a F, sleeper: S, base_url: Url, options: DownloadOptions) -> Self {
        Self {
            fetcher,
            sleeper,
            base_url,
            options,
            parser: DecisionParser::new(),
            fetched: 0,
            pause_first: false,
            summary: DownloadSummary::default(),
        }
    }

    /// Downloads follow another request to the site, such as a results
    /// page, so the first decision waits for the pause too
    pub fn follows_request(mut self) -> Self {
        self.pause_first = true;
        self
    }

    pub fn summary(&self) -> DownloadSummary {
        self.summary
    }

    /// Fetch, parse and save one decision.
    ///
    /// The raw page is dumped before parsing so that pages which fail to
    /// parse can still be inspected.
    pub fn download(&mut self, uri: &str, stub: Option<&ResultStub>) -> Result<ParsedDecision> {
        let result = self.download_inner(uri, stub);
        match &result {
            Ok(parsed) => {
                self.summary.downloaded += 1;
                self.summary.malformed_fields += parsed.malformed_fields;
            }
            Err(e) => {
                self.summary.failed += 1;
                log::warn!("[{}] Download failed: {}", uri, e);
            }
        }
        result
    }

    fn download_inner(&mut self, uri: &str, stub: Option<&ResultStub>) -> Result<ParsedDecision> {
        if self.fetched > 0 || self.pause_first {
            self.sleeper.sleep(self.options.pause);
        }
        self.fetched += 1;

        let html = fetch_decision(self.fetcher, &self.base_url, uri)?;
        if let Some(dump_dir) = &self.options.dump_dir {
            let path = output::dump_html(dump_dir, crate::search::results::decision_id(uri), &html)?;
            log::debug!("Dumped {} to {}", uri, path.display());
        }

        let parsed = match stub {
            Some(stub) => self.parser.parse_with_stub(&html, stub)?,
            None => self.parser.parse(&html, uri)?,
        };
        let path = output::save_decision(&self.options.download_dir, &parsed.record)?;
        log::info!("Saved {} ({} page) to {}", uri, parsed.era, path.display());
        Ok(parsed)
    }
}
