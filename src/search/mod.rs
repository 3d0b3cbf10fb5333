//! Query building and result-listing pagination.

pub mod paginator;
pub mod request;
pub mod results;

pub use paginator::{iterate, SearchResults, Sleeper, ThreadSleeper};
pub use request::{QueryBuilder, RequestSpec};
pub use results::{parse_results_page, MalformedRow, PageResult, ResultStub};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

use crate::courts::{CourtKind, CourtTable};
use crate::error::{CaseLawError, Result};

/// Pause between successive result pages unless the caller asks otherwise
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(10);

static BRACKETED_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d{4}\]").expect("valid regex"));

/// Search filters accepted by the advanced search form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Full text search
    pub body: Option<String>,
    /// Case name
    pub title: Option<String>,
    /// Judicial officer
    pub before: Option<String>,
    pub catchwords: Option<String>,
    pub party: Option<String>,
    /// Medium neutral citation, must include a bracketed year
    pub citation: Option<String>,
    /// Earliest decision date
    pub start_date: Option<NaiveDate>,
    /// Latest decision date
    pub end_date: Option<NaiveDate>,
    pub file_number: Option<String>,
    pub legislation_cited: Option<String>,
    pub cases_cited: Option<String>,
    /// 1-based court indices
    pub courts: Vec<usize>,
    /// 1-based tribunal indices
    pub tribunals: Vec<usize>,
    /// Pause between successive page fetches
    pub pause: Duration,
    /// Maximum number of results to yield
    pub limit: Option<usize>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            body: None,
            title: None,
            before: None,
            catchwords: None,
            party: None,
            citation: None,
            start_date: None,
            end_date: None,
            file_number: None,
            legislation_cited: None,
            cases_cited: None,
            courts: Vec::new(),
            tribunals: Vec::new(),
            pause: DEFAULT_PAUSE,
            limit: None,
        }
    }
}

impl SearchCriteria {
    /// Check the criteria against the court table before anything is fetched
    pub fn validate(&self, table: &CourtTable) -> Result<()> {
        check_indices(table, CourtKind::Courts, &self.courts)?;
        check_indices(table, CourtKind::Tribunals, &self.tribunals)?;

        if let Some(citation) = self.citation.as_deref().filter(|c| !c.trim().is_empty()) {
            if !BRACKETED_YEAR.is_match(citation) {
                return Err(CaseLawError::InvalidCriteria(format!(
                    "citation '{}' must include a bracketed year such as [2020]",
                    citation
                )));
            }
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(CaseLawError::InvalidCriteria(format!(
                    "start date {} is after end date {}",
                    start, end
                )));
            }
        }

        Ok(())
    }

    /// True when at least one court or tribunal is selected
    pub fn has_jurisdiction(&self) -> bool {
        !(self.courts.is_empty() && self.tribunals.is_empty())
    }
}

fn check_indices(table: &CourtTable, kind: CourtKind, indices: &[usize]) -> Result<()> {
    let available = table.entries(kind).len();
    match indices.iter().find(|&&index| table.get(kind, index).is_none()) {
        Some(index) => Err(CaseLawError::InvalidCriteria(format!(
            "{} index {} is out of range (1-{})",
            kind.display_name(),
            index,
            available
        ))),
        None => Ok(()),
    }
}
