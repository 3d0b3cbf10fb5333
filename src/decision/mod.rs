//! Decision detail pages: era detection, field extraction and the record type.

pub(crate) mod fields;
mod newer;
mod older;

use chrono::NaiveDate;
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::api::{fetch_html, PageFetcher};
use crate::error::{CaseLawError, Result};
use crate::search::{results::decision_id, ResultStub};

/// Metadata of the lower-court decision an appeal was brought from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_number: Option<String>,
    /// Judicial officer(s) below
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<NaiveDate>,
}

impl AppealDetails {
    pub fn is_empty(&self) -> bool {
        self.court.is_none()
            && self.jurisdiction.is_none()
            && self.citation.is_none()
            && self.file_number.is_none()
            && self.before.is_none()
            && self.decision_date.is_none()
    }
}

/// A fully parsed decision.
///
/// `title`, `uri` and `court` are always present; every other field is
/// `None` when the page did not provide it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub title: String,
    /// Site-relative reference, e.g. `/decision/54a0...`
    pub uri: String,
    pub court: String,
    /// Medium neutral citation
    #[serde(rename = "mnc", default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hearing_dates: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_orders: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Orders made, one line per paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catchwords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legislation_cited: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cases_cited: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representation: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_under_appeal: Option<AppealDetails>,
    /// Full text, one entry per paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judgment: Option<Vec<String>>,
}

impl DecisionRecord {
    /// Identifier at the end of the detail reference
    pub fn id(&self) -> &str {
        decision_id(&self.uri)
    }
}

/// Page layouts the site has used for decisions over time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateEra {
    /// Metadata in a layout table
    Older,
    /// Metadata in a `<dl>` coversheet
    Newer,
}

impl TemplateEra {
    /// Work out which layout a page uses from its structure
    pub fn detect(document: &Html) -> Option<Self> {
        if newer::has_coversheet(document) {
            Some(Self::Newer)
        } else if older::has_metadata_table(document) {
            Some(Self::Older)
        } else {
            None
        }
    }

    fn extract(self, document: &Html) -> fields::Extracted {
        match self {
            Self::Older => older::extract(document),
            Self::Newer => newer::extract(document),
        }
    }
}

impl fmt::Display for TemplateEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Older => write!(f, "older"),
            Self::Newer => write!(f, "newer"),
        }
    }
}

/// A parsed record with what the parser learned along the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDecision {
    pub record: DecisionRecord,
    pub era: TemplateEra,
    /// Values that were present but could not be interpreted
    pub malformed_fields: usize,
}

/// Parses decision detail pages of either era
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionParser;

impl DecisionParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, html: &str, source_uri: &str) -> Result<ParsedDecision> {
        self.parse_inner(html, source_uri, None)
    }

    /// Parse a page reached from a listing row; the stub's title and court
    /// fill in for a page that lacks them.
    pub fn parse_with_stub(&self, html: &str, stub: &ResultStub) -> Result<ParsedDecision> {
        self.parse_inner(html, &stub.uri, Some(stub))
    }

    fn parse_inner(
        &self,
        html: &str,
        source_uri: &str,
        stub: Option<&ResultStub>,
    ) -> Result<ParsedDecision> {
        let document = Html::parse_document(html);
        let era = TemplateEra::detect(&document).ok_or_else(|| CaseLawError::UnknownTemplateEra {
            source_uri: source_uri.to_string(),
            html_len: html.len(),
        })?;
        log::debug!("[{}] Parsing {} page", source_uri, era);

        let (record, malformed_fields) = fields::assemble(era.extract(&document), source_uri, stub)?;
        if malformed_fields > 0 {
            log::warn!("[{}] {} malformed field(s)", source_uri, malformed_fields);
        }
        Ok(ParsedDecision {
            record,
            era,
            malformed_fields,
        })
    }
}

/// Parse one decision page into a record
pub fn parse_detail_page(html: &str, source_uri: &str) -> Result<DecisionRecord> {
    DecisionParser::new().parse(html, source_uri).map(|p| p.record)
}

/// Absolute URL of a decision reference
pub fn decision_url(base_url: &Url, uri: &str) -> Result<Url> {
    base_url
        .join(uri)
        .map_err(|e| CaseLawError::InvalidInput(format!("bad decision reference '{}': {}", uri, e)))
}

/// Fetch a decision page, returning the raw HTML
pub fn fetch_decision<F: PageFetcher + ?Sized>(fetcher: &F, base_url: &Url, uri: &str) -> Result<String> {
    let url = decision_url(base_url, uri)?;
    fetch_html(fetcher, &url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NEWER: &str = r#"<html><head><title>Smith v Jones [2020] NSWSC 123 - NSW Caselaw</title></head>
        <body><dl>
        <dt>Medium Neutral Citation:</dt><dd>Smith v Jones [2020] NSWSC 123</dd>
        <dt>Decision date:</dt><dd>12 March 2020</dd>
        </dl><div class="body"><p>Reasons.</p></div></body></html>"#;

    #[test]
    fn test_detect_newer() {
        let record = parse_detail_page(NEWER, "/decision/abc").unwrap();
        assert_eq!(record.title, "Smith v Jones [2020] NSWSC 123");
        assert_eq!(record.court, "Supreme Court");
        assert_eq!(record.decision_date, NaiveDate::from_ymd_opt(2020, 3, 12));
        assert_eq!(record.judgment, Some(vec!["Reasons.".to_string()]));
        assert_eq!(record.id(), "abc");
    }

    #[test]
    fn test_unknown_layout() {
        let html = "<html><body><p>Maintenance</p></body></html>";
        match DecisionParser::new().parse(html, "/decision/zzz") {
            Err(CaseLawError::UnknownTemplateEra { source_uri, html_len }) => {
                assert_eq!(source_uri, "/decision/zzz");
                assert_eq!(html_len, html.len());
            }
            other => panic!("expected unknown era, got {:?}", other),
        }
    }

    #[test]
    fn test_stub_supplies_court() {
        let html = r#"<html><body><dl><dt>Category:</dt><dd>Costs</dd></dl></body></html>"#;
        let stub = ResultStub {
            uri: "/decision/abc".to_string(),
            title: "A v B".to_string(),
            court: "Land and Environment Court".to_string(),
            decision_date: None,
            before: None,
            catchwords: None,
        };
        let parsed = DecisionParser::new().parse_with_stub(html, &stub).unwrap();
        assert_eq!(parsed.era, TemplateEra::Newer);
        assert_eq!(parsed.record.title, "A v B");
        assert_eq!(parsed.record.court, "Land and Environment Court");
        assert_eq!(parsed.record.category.as_deref(), Some("Costs"));
    }

    #[test]
    fn test_absent_fields_are_omitted_from_json() {
        let record = parse_detail_page(NEWER, "/decision/abc").unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mnc"], "Smith v Jones [2020] NSWSC 123");
        assert_eq!(json["decisionDate"], "2020-03-12");
        assert!(json.get("catchwords").is_none());
        assert!(json.get("decisionUnderAppeal").is_none());
    }

    #[test]
    fn test_decision_url() {
        let base = Url::parse("https://www.caselaw.nsw.gov.au").unwrap();
        assert_eq!(
            decision_url(&base, "/decision/abc").unwrap().as_str(),
            "https://www.caselaw.nsw.gov.au/decision/abc"
        );
    }
}
