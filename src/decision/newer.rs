//! Decisions published with a `<dl>` coversheet and a `div.body` judgment.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::fields::{match_label, page_title, AppealField, Extracted, Field, Label, RawFields, Vocabulary};
use crate::html::{collapse_whitespace, inline_text, line_blocks, normalize_label, selector, starts_with_ignore_case};

static TERM: Lazy<Selector> = Lazy::new(|| selector("dt"));
static LABELS_AND_VALUES: Lazy<Selector> = Lazy::new(|| selector("dt, dd"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("div.body"));
static ONLY_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*+$").expect("valid regex"));

/// `dt` that switches the following pairs to the appeal vocabulary
const APPEAL_MARKER: &str = "Decision under appeal";

pub(crate) const VOCABULARY: Vocabulary = &[
    ("Medium Neutral Citation", Label::Main(Field::Citation)),
    ("Hearing date", Label::Main(Field::HearingDates)),
    ("Date of orders", Label::Main(Field::DateOfOrders)),
    ("Decision date", Label::Main(Field::DecisionDate)),
    ("Jurisdiction", Label::Main(Field::Jurisdiction)),
    ("Before", Label::Main(Field::Before)),
    ("Decision", Label::Main(Field::Decision)),
    ("Catchwords", Label::Main(Field::Catchwords)),
    ("Legislation Cited", Label::Main(Field::LegislationCited)),
    ("Cases Cited", Label::Main(Field::CasesCited)),
    ("Parties", Label::Main(Field::Parties)),
    ("Category", Label::Main(Field::Category)),
    ("File Number", Label::Main(Field::FileNumber)),
    ("Representation", Label::Main(Field::Representation)),
    ("Court", Label::Main(Field::Court)),
];

pub(crate) const APPEAL_VOCABULARY: Vocabulary = &[
    ("Court or tribunal", Label::Appeal(AppealField::Court)),
    ("Jurisdiction", Label::Appeal(AppealField::Jurisdiction)),
    ("Citation", Label::Appeal(AppealField::Citation)),
    ("Date of Decision", Label::Appeal(AppealField::DecisionDate)),
    ("Before", Label::Appeal(AppealField::Before)),
    ("File Number", Label::Appeal(AppealField::FileNumber)),
];

/// True when the page carries `dt` labelled metadata
pub(crate) fn has_coversheet(document: &Html) -> bool {
    document.select(&TERM).next().is_some()
}

pub(crate) fn extract(document: &Html) -> Extracted {
    let mut raw = RawFields::default();
    let mut vocabulary = VOCABULARY;
    let mut pending: Option<String> = None;

    for element in document.select(&LABELS_AND_VALUES) {
        if element.value().name() == "dt" {
            let header = normalize_label(&inline_text(element));
            if starts_with_ignore_case(&header, APPEAL_MARKER) {
                vocabulary = APPEAL_VOCABULARY;
                pending = None;
            } else {
                pending = Some(header);
            }
            continue;
        }

        let Some(header) = pending.take() else {
            continue;
        };
        match match_label(vocabulary, &header) {
            Some(label) => raw.insert(label, value_blocks(element)),
            None => log::debug!("Ignoring unknown label '{}'", header),
        }
    }

    Extracted {
        raw,
        judgment: judgment(document),
        page_title: page_title(document),
    }
}

/// One block per `<p>`, or per line when the value has no paragraphs
fn value_blocks(dd: ElementRef<'_>) -> Vec<String> {
    let paragraphs: Vec<String> = dd.select(&PARAGRAPH).map(inline_text).collect();
    if paragraphs.is_empty() {
        line_blocks(dd)
    } else {
        paragraphs
    }
}

fn judgment(document: &Html) -> Vec<String> {
    let Some(body) = document.select(&BODY).next() else {
        log::warn!("No judgment body found");
        return Vec::new();
    };

    let mut paragraphs = Vec::new();
    for child in body.children() {
        let Some(element) = ElementRef::wrap(child) else {
            if let Some(text) = child.value().as_text() {
                push_text(&mut paragraphs, &collapse_whitespace(text));
            }
            continue;
        };

        match element.value().name() {
            "ol" => {
                let mut number: u32 = element
                    .value()
                    .attr("start")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(1);
                for item in element.children().filter_map(ElementRef::wrap) {
                    if item.value().name() != "li" {
                        continue;
                    }
                    push_text(&mut paragraphs, &format!("{} {}", number, inline_text(item)));
                    number += 1;
                }
            }
            "p" if is_ignored(element) => {}
            _ => push_text(&mut paragraphs, &inline_text(element)),
        }
    }
    paragraphs
}

fn push_text(paragraphs: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        paragraphs.push(text.to_string());
    }
}

/// Disclaimers, last-updated notes and `***` separators
fn is_ignored(p: ElementRef<'_>) -> bool {
    if p.value()
        .classes()
        .any(|c| c == "disclaimer" || c == "lastupdate")
    {
        return true;
    }
    ONLY_STARS.is_match(&inline_text(p).replace(' ', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judgment_paragraphs() {
        let html = Html::parse_document(
            r#"<html><body><div class="body">
                <h2>Judgment</h2>
                <ol start="3"><li>First <em>point</em>.</li><li>Second point.</li></ol>
                <p>   </p>
                <p>* * *</p>
                <p class="disclaimer">Decision last updated</p>
                <blockquote>Quoted passage</blockquote>
            </div></body></html>"#,
        );
        assert_eq!(
            judgment(&html),
            vec!["Judgment", "3 First point.", "4 Second point.", "Quoted passage"]
        );
    }

    #[test]
    fn test_value_blocks_by_line_when_no_paragraphs() {
        let html = Html::parse_document("<dl><dt>Parties:</dt><dd>A (Plaintiff)<br>B (Defendant)</dd></dl>");
        let dd = html.select(&selector("dd")).next().unwrap();
        assert_eq!(value_blocks(dd), vec!["A (Plaintiff)", "B (Defendant)"]);
    }

    #[test]
    fn test_italic_and_linked_entries_stay_whole() {
        let html = Html::parse_document(
            r#"<html><head><title>A v B [2019] NSWCA 1 - NSW Caselaw</title></head><body><dl>
                <dt>Cases Cited:</dt>
                <dd><em>Smith v Jones</em> (2001) 1 CLR 1<br><em>Wyong Shire Council v Shirt</em> (1980) 146 CLR 40</dd>
                <dt>Legislation Cited:</dt>
                <dd><a href="/act/2002-22">Civil Liability Act 2002 (NSW)</a>, s 5B<br>Uniform Civil Procedure Rules 2005 (NSW)</dd>
            </dl></body></html>"#,
        );
        let (record, _) = super::super::fields::assemble(extract(&html), "/decision/x", None).unwrap();
        assert_eq!(
            record.cases_cited.unwrap(),
            vec!["Smith v Jones (2001) 1 CLR 1", "Wyong Shire Council v Shirt (1980) 146 CLR 40"]
        );
        assert_eq!(
            record.legislation_cited.unwrap(),
            vec!["Civil Liability Act 2002 (NSW), s 5B", "Uniform Civil Procedure Rules 2005 (NSW)"]
        );
    }

    #[test]
    fn test_appeal_marker_switches_vocabulary() {
        let html = Html::parse_document(
            r#"<html><head><title>A v B [2019] NSWCA 1 - NSW Caselaw</title></head><body><dl>
                <dt>Medium Neutral Citation:</dt><dd>A v B [2019] NSWCA 1</dd>
                <dt>Before:</dt><dd>Smith JA</dd>
                <dt>Decision under appeal</dt><dd></dd>
                <dt>Before:</dt><dd>Jones DCJ</dd>
                <dt>Court or tribunal:</dt><dd>District Court</dd>
            </dl></body></html>"#,
        );
        let extracted = extract(&html);
        assert_eq!(extracted.page_title.as_deref(), Some("A v B [2019] NSWCA 1"));
        let (record, _) = super::super::fields::assemble(extracted, "/decision/x", None).unwrap();
        assert_eq!(record.court, "Court of Appeal");
        assert_eq!(record.before.as_deref(), Some("Smith JA"));
        let appeal = record.decision_under_appeal.unwrap();
        assert_eq!(appeal.before.as_deref(), Some("Jones DCJ"));
        assert_eq!(appeal.court.as_deref(), Some("District Court"));
    }
}
