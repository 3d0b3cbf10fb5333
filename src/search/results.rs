use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::html::{inline_text, normalize_label, parse_site_date, selector, starts_with_ignore_case, text_or_none};

static RESULT_ROW: Lazy<Selector> = Lazy::new(|| selector("div.result, li.result"));
static DECISION_LINK: Lazy<Selector> = Lazy::new(|| selector("a[href*=\"/decision/\"]"));
static ROW_ITEM: Lazy<Selector> = Lazy::new(|| selector("li"));
static PAGINATION: Lazy<Selector> = Lazy::new(|| selector("ul.pagination"));
static NEXT_PAGE: Lazy<Selector> = Lazy::new(|| selector("li.next"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));

static DECISION_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(/decision/[0-9A-Za-z]+)").expect("valid regex"));
static TOTAL_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bof\s+([\d,]+)\s+results?\b").expect("valid regex"));

/// One row of a results listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStub {
    /// Site-relative detail page reference, e.g. `/decision/54a0...`
    pub uri: String,
    pub title: String,
    /// Court or tribunal name
    pub court: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catchwords: Option<String>,
}

impl ResultStub {
    /// Identifier at the end of the detail reference
    pub fn id(&self) -> &str {
        decision_id(&self.uri)
    }
}

/// Last path segment of a decision reference
pub fn decision_id(uri: &str) -> &str {
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri)
}

/// A listing row that could not be turned into a stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// Zero-based position of the row on the page
    pub position: usize,
    pub reason: String,
}

/// Everything extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub stubs: Vec<ResultStub>,
    /// Whether the pagination control offers a next page
    pub has_more: bool,
    /// Total matches reported by the site, possibly approximate
    pub total_count: Option<u64>,
    pub skipped: Vec<MalformedRow>,
}

impl PageResult {
    pub fn skipped_rows(&self) -> usize {
        self.skipped.len()
    }
}

/// Parse a results listing page.
///
/// Malformed rows are skipped and reported in [`PageResult::skipped`]; a page
/// without a pagination control is treated as the last page.
pub fn parse_results_page(html: &str) -> PageResult {
    let document = Html::parse_document(html);

    let mut result = PageResult::default();
    for (position, row) in document.select(&RESULT_ROW).enumerate() {
        match parse_row(row) {
            Ok(stub) => result.stubs.push(stub),
            Err(reason) => {
                log::warn!("Skipping result row {}: {}", position, reason);
                result.skipped.push(MalformedRow { position, reason });
            }
        }
    }

    result.has_more = has_next_page(&document);
    result.total_count = total_count(&document);
    result
}

fn parse_row(row: ElementRef<'_>) -> Result<ResultStub, String> {
    let link = row
        .select(&DECISION_LINK)
        .next()
        .ok_or_else(|| "no decision link".to_string())?;
    let href = link.value().attr("href").unwrap_or_default();
    let uri = DECISION_PATH
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| format!("unrecognised decision link '{}'", href))?;
    let title = text_or_none(&inline_text(link)).ok_or_else(|| format!("{} has no title", uri))?;

    let mut court = None;
    let mut decision_date = None;
    let mut before = None;
    let mut catchwords = None;
    for item in row.select(&ROW_ITEM) {
        let text = inline_text(item);
        let Some((label, value)) = text.split_once(':') else {
            continue;
        };
        let label = normalize_label(label);
        let value = text_or_none(value);
        if starts_with_ignore_case(&label, "Decision date") {
            decision_date = value.as_deref().and_then(|v| {
                let date = parse_site_date(v);
                if date.is_none() {
                    log::debug!("Unparseable decision date '{}' for {}", v, uri);
                }
                date
            });
        } else if starts_with_ignore_case(&label, "Court") || starts_with_ignore_case(&label, "Tribunal") {
            court = value;
        } else if starts_with_ignore_case(&label, "Before") {
            before = value;
        } else if starts_with_ignore_case(&label, "Catchwords") {
            catchwords = value;
        }
    }

    let court = court.ok_or_else(|| format!("{} has no court or tribunal", uri))?;

    Ok(ResultStub {
        uri,
        title,
        court,
        decision_date,
        before,
        catchwords,
    })
}

fn has_next_page(document: &Html) -> bool {
    let Some(pagination) = document.select(&PAGINATION).next() else {
        return false;
    };
    pagination.select(&NEXT_PAGE).any(|next| {
        !next.value().classes().any(|c| c == "disabled") && next.select(&LINK).next().is_some()
    })
}

fn total_count(document: &Html) -> Option<u64> {
    let text = inline_text(document.root_element());
    let digits = TOTAL_COUNT.captures(&text)?.get(1)?.as_str().replace(',', "");
    digits.parse().ok()
}
