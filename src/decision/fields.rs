use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashMap;

use super::{AppealDetails, DecisionRecord};
use crate::courts::court_for_citation;
use crate::error::{CaseLawError, Result};
use crate::html::{
    collapse_whitespace, contains_ignore_case, inline_text, normalize_label, parse_site_date, selector,
    starts_with_ignore_case, text_or_none,
};
use crate::search::ResultStub;

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));

const NOT_APPLICABLE: &str = "Not Applicable";

/// Em dash, en dash, or a hyphen with spaces on both sides
static CATCHWORD_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\u{2014}\u{2013}]\s*|\s+-\s+").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    Citation,
    HearingDates,
    DateOfOrders,
    DecisionDate,
    Jurisdiction,
    Before,
    Decision,
    Catchwords,
    LegislationCited,
    CasesCited,
    Parties,
    Category,
    FileNumber,
    Representation,
    Counsel,
    Solicitors,
    Court,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum AppealField {
    Court,
    Jurisdiction,
    Citation,
    DecisionDate,
    Before,
    FileNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Label {
    Main(Field),
    Appeal(AppealField),
}

/// Page labels an era recognises, matched as case-insensitive prefixes
pub(crate) type Vocabulary = &'static [(&'static str, Label)];

/// Longest vocabulary label that prefixes the normalised header
pub(crate) fn match_label(vocabulary: Vocabulary, header: &str) -> Option<Label> {
    let header = normalize_label(header);
    vocabulary
        .iter()
        .filter(|(label, _)| starts_with_ignore_case(&header, label))
        .max_by_key(|(label, _)| label.len())
        .map(|(_, field)| *field)
}

/// Longest vocabulary label found anywhere in the normalised header
pub(crate) fn match_label_anywhere(vocabulary: Vocabulary, header: &str) -> Option<Label> {
    let header = normalize_label(header);
    vocabulary
        .iter()
        .filter(|(label, _)| contains_ignore_case(&header, label))
        .max_by_key(|(label, _)| label.len())
        .map(|(_, field)| *field)
}

/// Label/value pairs collected from a page before normalisation.
///
/// Values are kept as text blocks: one per paragraph or line.
#[derive(Debug, Default)]
pub(crate) struct RawFields {
    main: HashMap<Field, Vec<String>>,
    appeal: HashMap<AppealField, Vec<String>>,
}

impl RawFields {
    /// Record a value; the first occurrence of a label wins and blank values are dropped.
    ///
    /// Older pages fill unused lower-court rows with "Not Applicable", which
    /// counts as blank.
    pub(crate) fn insert(&mut self, label: Label, blocks: Vec<String>) {
        let blocks: Vec<String> = blocks
            .iter()
            .map(|b| collapse_whitespace(b))
            .filter(|b| !b.is_empty())
            .filter(|b| !(matches!(label, Label::Appeal(_)) && b.eq_ignore_ascii_case(NOT_APPLICABLE)))
            .collect();
        if blocks.is_empty() {
            return;
        }
        match label {
            Label::Main(field) => {
                self.main.entry(field).or_insert(blocks);
            }
            Label::Appeal(field) => {
                self.appeal.entry(field).or_insert(blocks);
            }
        }
    }

    fn main(&self, field: Field) -> Option<&[String]> {
        self.main.get(&field).map(Vec::as_slice)
    }

    fn appeal(&self, field: AppealField) -> Option<&[String]> {
        self.appeal.get(&field).map(Vec::as_slice)
    }
}

/// What an era-specific extractor pulls out of a page
#[derive(Debug, Default)]
pub(crate) struct Extracted {
    pub raw: RawFields,
    pub judgment: Vec<String>,
    pub page_title: Option<String>,
}

/// Case name from the `<title>` tag, without the site suffix
pub(crate) fn page_title(document: &Html) -> Option<String> {
    let title = inline_text(document.select(&TITLE).next()?);
    let name = title.rsplit_once(" - ").map_or(title.as_str(), |(name, _)| name);
    text_or_none(name)
}

fn scalar(blocks: Option<&[String]>) -> Option<String> {
    blocks.and_then(|b| text_or_none(&b.join(" ")))
}

fn multiline(blocks: Option<&[String]>) -> Option<String> {
    blocks
        .map(|b| b.join("\n"))
        .filter(|text| !text.trim().is_empty())
}

fn list(blocks: Option<&[String]>) -> Option<Vec<String>> {
    let items: Vec<String> = blocks?.iter().filter_map(|b| text_or_none(b)).collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Split catchword blocks into individual phrases
pub(crate) fn split_catchwords(blocks: &[String]) -> Vec<String> {
    blocks
        .iter()
        .flat_map(|block| CATCHWORD_DELIMITER.split(block))
        .filter_map(text_or_none)
        .collect()
}

/// Turn collected fields into a record, enforcing the required fields.
///
/// Returns the record and the number of values that were present but
/// could not be interpreted.
pub(crate) fn assemble(
    extracted: Extracted,
    source_uri: &str,
    stub: Option<&ResultStub>,
) -> Result<(DecisionRecord, usize)> {
    let raw = &extracted.raw;
    let mut malformed = 0;
    let mut date = |blocks: Option<&[String]>, what: &str| {
        let text = scalar(blocks)?;
        let parsed = parse_site_date(&text);
        if parsed.is_none() {
            malformed += 1;
            log::warn!("[{}] Unparseable {} '{}'", source_uri, what, text);
        }
        parsed
    };

    let decision_date = date(raw.main(Field::DecisionDate), "decision date");
    let appeal_date = date(raw.appeal(AppealField::DecisionDate), "appeal decision date");

    let citation = scalar(raw.main(Field::Citation));

    let title = extracted
        .page_title
        .clone()
        .or_else(|| stub.map(|s| s.title.clone()))
        .or_else(|| citation.clone())
        .ok_or_else(|| CaseLawError::MissingField {
            source_uri: source_uri.to_string(),
            field: "title",
        })?;

    let court = scalar(raw.main(Field::Court))
        .or_else(|| citation.as_deref().and_then(court_for_citation).map(str::to_string))
        .or_else(|| stub.map(|s| s.court.clone()))
        .ok_or_else(|| CaseLawError::MissingField {
            source_uri: source_uri.to_string(),
            field: "court",
        })?;

    let catchwords = raw.main(Field::Catchwords).map(split_catchwords).filter(|c| !c.is_empty());

    let representation = list(raw.main(Field::Representation)).or_else(|| {
        let mut combined = list(raw.main(Field::Counsel)).unwrap_or_default();
        combined.extend(list(raw.main(Field::Solicitors)).unwrap_or_default());
        if combined.is_empty() {
            None
        } else {
            Some(combined)
        }
    });

    let appeal = AppealDetails {
        court: scalar(raw.appeal(AppealField::Court)),
        jurisdiction: scalar(raw.appeal(AppealField::Jurisdiction)),
        citation: scalar(raw.appeal(AppealField::Citation)),
        file_number: scalar(raw.appeal(AppealField::FileNumber)),
        before: scalar(raw.appeal(AppealField::Before)),
        decision_date: appeal_date,
    };

    let judgment = if extracted.judgment.is_empty() {
        None
    } else {
        Some(extracted.judgment)
    };

    let record = DecisionRecord {
        title,
        uri: source_uri.to_string(),
        court,
        citation,
        decision_date,
        hearing_dates: scalar(raw.main(Field::HearingDates)),
        date_of_orders: scalar(raw.main(Field::DateOfOrders)),
        jurisdiction: scalar(raw.main(Field::Jurisdiction)),
        before: scalar(raw.main(Field::Before)),
        decision: multiline(raw.main(Field::Decision)),
        catchwords,
        legislation_cited: list(raw.main(Field::LegislationCited)),
        cases_cited: list(raw.main(Field::CasesCited)),
        parties: list(raw.main(Field::Parties)),
        category: scalar(raw.main(Field::Category)),
        file_number: scalar(raw.main(Field::FileNumber)),
        representation,
        decision_under_appeal: if appeal.is_empty() { None } else { Some(appeal) },
        judgment,
    };

    Ok((record, malformed))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOCAB: Vocabulary = &[
        ("Decision", Label::Main(Field::Decision)),
        ("Decision date", Label::Main(Field::DecisionDate)),
        ("File Number", Label::Main(Field::FileNumber)),
    ];

    #[test]
    fn test_match_label_prefers_longest() {
        assert_eq!(match_label(VOCAB, "Decision date:"), Some(Label::Main(Field::DecisionDate)));
        assert_eq!(match_label(VOCAB, "Decision:"), Some(Label::Main(Field::Decision)));
        assert_eq!(match_label(VOCAB, "file number(s):"), Some(Label::Main(Field::FileNumber)));
        assert_eq!(match_label(VOCAB, "Publication restriction:"), None);
    }

    #[test]
    fn test_split_catchwords() {
        let blocks = vec![
            "TORTS \u{2014} negligence \u{2014} duty of care".to_string(),
            "PROCEDURE - non-party discovery - costs".to_string(),
        ];
        assert_eq!(
            split_catchwords(&blocks),
            vec![
                "TORTS",
                "negligence",
                "duty of care",
                "PROCEDURE",
                "non-party discovery",
                "costs"
            ]
        );
    }

    #[test]
    fn test_blank_values_are_not_recorded() {
        let mut raw = RawFields::default();
        raw.insert(Label::Main(Field::Category), vec!["  ".to_string()]);
        assert!(raw.main(Field::Category).is_none());
    }

    #[test]
    fn test_not_applicable_appeal_values_are_blank() {
        let mut raw = RawFields::default();
        raw.insert(Label::Appeal(AppealField::Court), vec!["Not Applicable".to_string()]);
        raw.insert(Label::Main(Field::Category), vec!["Not Applicable".to_string()]);
        assert!(raw.appeal(AppealField::Court).is_none());
        assert!(raw.main(Field::Category).is_some());
    }

    #[test]
    fn test_first_value_wins() {
        let mut raw = RawFields::default();
        raw.insert(Label::Main(Field::Category), vec!["Principal judgment".to_string()]);
        raw.insert(Label::Main(Field::Category), vec!["Costs".to_string()]);
        assert_eq!(raw.main(Field::Category).unwrap(), ["Principal judgment".to_string()]);
    }

    #[test]
    fn test_assemble_requires_court() {
        let mut extracted = Extracted {
            page_title: Some("A v B".to_string()),
            ..Default::default()
        };
        extracted.raw.insert(Label::Main(Field::Category), vec!["Costs".to_string()]);
        let err = assemble(extracted, "/decision/x", None).unwrap_err();
        assert!(matches!(err, CaseLawError::MissingField { field: "court", .. }));
    }

    #[test]
    fn test_assemble_court_from_citation() {
        let mut extracted = Extracted::default();
        extracted
            .raw
            .insert(Label::Main(Field::Citation), vec!["A v B [2015] NSWCA 7".to_string()]);
        let (record, malformed) = assemble(extracted, "/decision/x", None).unwrap();
        assert_eq!(record.court, "Court of Appeal");
        assert_eq!(record.title, "A v B [2015] NSWCA 7");
        assert_eq!(malformed, 0);
    }

    #[test]
    fn test_assemble_counts_bad_dates() {
        let mut extracted = Extracted {
            page_title: Some("A v B".to_string()),
            ..Default::default()
        };
        extracted.raw.insert(Label::Main(Field::Court), vec!["Local Court".to_string()]);
        extracted.raw.insert(Label::Main(Field::DecisionDate), vec!["soon".to_string()]);
        let (record, malformed) = assemble(extracted, "/decision/x", None).unwrap();
        assert_eq!(record.decision_date, None);
        assert_eq!(malformed, 1);
    }
}
