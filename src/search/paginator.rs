use std::collections::VecDeque;
use std::time::Duration;
use url::Url;

use super::request::QueryBuilder;
use super::results::{parse_results_page, ResultStub};
use super::SearchCriteria;
use crate::api::{fetch_html, PageFetcher};
use crate::courts::CourtTable;
use crate::error::Result;

/// Cooperative wait between requests to the site
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Lazy sequence of result stubs.
///
/// `next()` is the only place a page is fetched: the first call fetches
/// page 0, and the following page is fetched only once the buffered stubs
/// are exhausted and the previous page offered a next page. The configured
/// pause elapses before every fetch except the first, and before the first
/// too after [`SearchResults::follows_request`].
pub struct SearchResults<'a, F: PageFetcher + ?Sized, S: Sleeper> {
    builder: QueryBuilder<'a>,
    criteria: SearchCriteria,
    fetcher: &'a F,
    sleeper: S,
    next_page: u32,
    pages_fetched: u32,
    pause_first: bool,
    buffer: VecDeque<ResultStub>,
    yielded: usize,
    has_more: bool,
    finished: bool,
    skipped_rows: usize,
    total_count: Option<u64>,
}

/// Start a search. Criteria are validated here, before any fetch.
pub fn iterate<'a, F, S>(
    criteria: &SearchCriteria,
    courts: &'a CourtTable,
    base_url: &Url,
    fetcher: &'a F,
    sleeper: S,
) -> Result<SearchResults<'a, F, S>>
where
    F: PageFetcher + ?Sized,
    S: Sleeper,
{
    let builder = QueryBuilder::new(courts, base_url)?;
    criteria.validate(courts)?;

    Ok(SearchResults {
        builder,
        criteria: criteria.clone(),
        fetcher,
        sleeper,
        next_page: 0,
        pages_fetched: 0,
        pause_first: false,
        buffer: VecDeque::new(),
        yielded: 0,
        has_more: true,
        finished: false,
        skipped_rows: 0,
        total_count: None,
    })
}

impl<'a, F: PageFetcher + ?Sized, S: Sleeper> SearchResults<'a, F, S> {
    /// Malformed rows skipped so far, across all fetched pages
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Total matches most recently reported by the site
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// The site was contacted just before this search, so page 0 waits for
    /// the pause as well
    pub fn follows_request(mut self) -> Self {
        self.pause_first = true;
        self
    }

    fn remaining(&self) -> Option<usize> {
        self.criteria
            .limit
            .map(|limit| limit.saturating_sub(self.yielded + self.buffer.len()))
    }

    fn fetch_next_page(&mut self) -> Result<()> {
        let page = self.next_page;
        if self.pages_fetched > 0 || self.pause_first {
            log::debug!("Pausing {:?} before page {}", self.criteria.pause, page);
            self.sleeper.sleep(self.criteria.pause);
        }

        let request = self.builder.build_request(&self.criteria, page)?;
        let url = request.url();
        let html = fetch_html(self.fetcher, &url).map_err(|e| e.at_page(page))?;
        self.pages_fetched += 1;
        self.next_page += 1;

        let mut result = parse_results_page(&html);
        log::info!(
            "Page {}: {} results, {} skipped, total {}",
            page,
            result.stubs.len(),
            result.skipped_rows(),
            result
                .total_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        self.skipped_rows += result.skipped_rows();
        if result.total_count.is_some() {
            self.total_count = result.total_count;
        }
        self.has_more = result.has_more;
        if result.stubs.is_empty() && result.skipped.is_empty() {
            // An empty page cannot advance the cursor
            self.has_more = false;
        }

        if let Some(remaining) = self.remaining() {
            result.stubs.truncate(remaining);
        }
        self.buffer.extend(result.stubs);
        Ok(())
    }
}

impl<'a, F: PageFetcher + ?Sized, S: Sleeper> Iterator for SearchResults<'a, F, S> {
    type Item = Result<ResultStub>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if self.criteria.limit.is_some_and(|limit| self.yielded >= limit) {
                self.finished = true;
                return None;
            }
            if let Some(stub) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(Ok(stub));
            }
            if !self.has_more {
                self.finished = true;
                return None;
            }
            if let Err(e) = self.fetch_next_page() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FetchedPage, CASELAW_BASE_URL};
    use crate::error::CaseLawError;
    use std::cell::{Cell, RefCell};

    fn listing(start: usize, count: usize, has_next: bool) -> String {
        let mut html = String::from("<html><body>");
        for i in start..start + count {
            html.push_str(&format!(
                r#"<div class="result"><h4><a href="/decision/{:04x}">Case {}</a></h4><ul><li>Court: Supreme Court</li></ul></div>"#,
                i, i
            ));
        }
        if has_next {
            html.push_str(r#"<ul class="pagination"><li class="next"><a href="?page=x">Next</a></li></ul>"#);
        }
        html.push_str("</body></html>");
        html
    }

    /// Serves `pages[n]` for `page=n` and records every request
    struct FakeSite {
        pages: Vec<String>,
        requests: RefCell<Vec<u32>>,
    }

    impl PageFetcher for FakeSite {
        fn fetch(&self, url: &Url) -> Result<FetchedPage> {
            let page: u32 = url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap();
            self.requests.borrow_mut().push(page);
            match self.pages.get(page as usize) {
                Some(body) => Ok(FetchedPage::ok(body.clone())),
                None => Ok(FetchedPage {
                    status: 500,
                    body: String::new(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct CountingSleeper {
        calls: Cell<u32>,
    }

    impl Sleeper for CountingSleeper {
        fn sleep(&self, _duration: Duration) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    fn criteria(limit: Option<usize>) -> SearchCriteria {
        SearchCriteria {
            courts: vec![13],
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn test_walks_pages_until_no_next() {
        let site = FakeSite {
            pages: vec![listing(0, 3, true), listing(3, 3, true), listing(6, 2, false)],
            requests: RefCell::new(Vec::new()),
        };
        let sleeper = CountingSleeper::default();
        let table = CourtTable::builtin();
        let base = Url::parse(CASELAW_BASE_URL).unwrap();

        let stubs: Vec<ResultStub> = iterate(&criteria(None), &table, &base, &site, &sleeper)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(stubs.len(), 8);
        assert_eq!(stubs[0].title, "Case 0");
        assert_eq!(stubs[7].title, "Case 7");
        assert_eq!(*site.requests.borrow(), vec![0, 1, 2]);
        // No pause before the first fetch
        assert_eq!(sleeper.calls.get(), 2);
    }

    #[test]
    fn test_follows_request_pauses_before_first_page() {
        let site = FakeSite {
            pages: vec![listing(0, 2, true), listing(2, 1, false)],
            requests: RefCell::new(Vec::new()),
        };
        let sleeper = CountingSleeper::default();
        let table = CourtTable::builtin();
        let base = Url::parse(CASELAW_BASE_URL).unwrap();

        let mut results = iterate(&criteria(None), &table, &base, &site, &sleeper)
            .unwrap()
            .follows_request();
        results.next().unwrap().unwrap();
        assert_eq!(sleeper.calls.get(), 1);
        assert_eq!(results.count(), 2);
        assert_eq!(sleeper.calls.get(), 2);
    }

    #[test]
    fn test_fetches_lazily() {
        let site = FakeSite {
            pages: vec![listing(0, 2, true), listing(2, 2, false)],
            requests: RefCell::new(Vec::new()),
        };
        let table = CourtTable::builtin();
        let base = Url::parse(CASELAW_BASE_URL).unwrap();
        let mut results = iterate(&criteria(None), &table, &base, &site, ThreadSleeper).unwrap();
        assert!(site.requests.borrow().is_empty());

        results.next();
        results.next();
        assert_eq!(*site.requests.borrow(), vec![0]);
        results.next();
        assert_eq!(*site.requests.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_limit_truncates_last_page() {
        let site = FakeSite {
            pages: vec![listing(0, 3, true), listing(3, 3, true), listing(6, 3, true)],
            requests: RefCell::new(Vec::new()),
        };
        let table = CourtTable::builtin();
        let base = Url::parse(CASELAW_BASE_URL).unwrap();
        let mut results = iterate(&criteria(Some(4)), &table, &base, &site, ThreadSleeper).unwrap();
        let mut count = 0;
        for stub in results.by_ref() {
            stub.unwrap();
            count += 1;
        }
        assert_eq!(count, 4);
        assert_eq!(*site.requests.borrow(), vec![0, 1]);
        assert_eq!(results.pages_fetched(), 2);
    }

    #[test]
    fn test_transport_failure_reports_page_and_stops() {
        let site = FakeSite {
            pages: vec![listing(0, 2, true)],
            requests: RefCell::new(Vec::new()),
        };
        let table = CourtTable::builtin();
        let base = Url::parse(CASELAW_BASE_URL).unwrap();
        let items: Vec<Result<ResultStub>> = iterate(&criteria(None), &table, &base, &site, ThreadSleeper)
            .unwrap()
            .collect();

        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok() && items[1].is_ok());
        match &items[2] {
            Err(CaseLawError::Transport { page, status, url, .. }) => {
                assert_eq!(*page, Some(1));
                assert_eq!(*status, Some(500));
                assert!(url.ends_with("page=1"));
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_criteria_fails_before_fetch() {
        let site = FakeSite {
            pages: vec![listing(0, 1, false)],
            requests: RefCell::new(Vec::new()),
        };
        let table = CourtTable::builtin();
        let base = Url::parse(CASELAW_BASE_URL).unwrap();
        let bad = SearchCriteria {
            courts: vec![999],
            ..Default::default()
        };
        let result = iterate(&bad, &table, &base, &site, ThreadSleeper);
        assert!(matches!(result, Err(CaseLawError::InvalidCriteria(_))));
        assert!(site.requests.borrow().is_empty());
    }
}
