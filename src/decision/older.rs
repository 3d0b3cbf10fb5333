//! Decisions published as a layout table: label cells on the left, values on
//! the right, and the judgment text in a cell broken up by `<ul>` blocks.
//!
//! Labels may appear anywhere in the header cell, e.g. "CURRENT JURISDICTION".

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::fields::{match_label_anywhere, page_title, AppealField, Extracted, Field, Label, RawFields, Vocabulary};
use crate::html::{collapse_whitespace, inline_text, line_blocks, normalize_label, selector, stripped_strings};

static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
static CELL: Lazy<Selector> = Lazy::new(|| selector("td"));

pub(crate) const VOCABULARY: Vocabulary = &[
    ("CITATION", Label::Main(Field::Citation)),
    ("HEARING DATE", Label::Main(Field::HearingDates)),
    ("DATE OF ORDERS", Label::Main(Field::DateOfOrders)),
    ("JUDGMENT DATE", Label::Main(Field::DecisionDate)),
    ("DECISION DATE", Label::Main(Field::DecisionDate)),
    ("JURISDICTION", Label::Main(Field::Jurisdiction)),
    ("JUDGMENT OF", Label::Main(Field::Before)),
    ("DECISION", Label::Main(Field::Decision)),
    ("CATCHWORDS", Label::Main(Field::Catchwords)),
    ("LEGISLATION CITED", Label::Main(Field::LegislationCited)),
    ("CASES CITED", Label::Main(Field::CasesCited)),
    ("PARTIES", Label::Main(Field::Parties)),
    ("CATEGORY", Label::Main(Field::Category)),
    ("FILE NUMBER", Label::Main(Field::FileNumber)),
    ("COUNSEL", Label::Main(Field::Counsel)),
    ("SOLICITORS", Label::Main(Field::Solicitors)),
    ("COURT", Label::Main(Field::Court)),
    ("LOWER COURT JURISDICTION", Label::Appeal(AppealField::Court)),
    ("LOWER COURT FILE NUMBER", Label::Appeal(AppealField::FileNumber)),
    ("LOWER COURT JUDICIAL OFFICER", Label::Appeal(AppealField::Before)),
    ("LOWER COURT DATE OF DECISION", Label::Appeal(AppealField::DecisionDate)),
    ("LOWER COURT CITATION", Label::Appeal(AppealField::Citation)),
];

/// Direct `td` children of a row
fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .collect()
}

/// True when the page carries a metadata row of at least three cells
pub(crate) fn has_metadata_table(document: &Html) -> bool {
    document.select(&ROW).any(|row| cells(row).len() >= 3)
}

pub(crate) fn extract(document: &Html) -> Extracted {
    let mut raw = RawFields::default();

    for row in document.select(&ROW) {
        let cells = cells(row);
        if cells.len() < 3 {
            continue;
        }
        let header = normalize_label(&inline_text(cells[1]));
        if header.is_empty() {
            continue;
        }
        match match_label_anywhere(VOCABULARY, &header) {
            Some(label) => raw.insert(label, line_blocks(cells[2])),
            None => log::debug!("Ignoring unknown label '{}'", header),
        }
    }

    Extracted {
        raw,
        judgment: judgment(document),
        page_title: page_title(document),
    }
}

/// Judgment text from cells laid out with `<ul>` separators.
///
/// Each `<ul>` closes the current paragraph; text inside a `<ul>` is an
/// indented passage and belongs to the paragraph before it.
fn judgment(document: &Html) -> Vec<String> {
    let mut paragraphs: Vec<Vec<String>> = Vec::new();

    for cell in document.select(&CELL) {
        let has_separator = cell
            .children()
            .filter_map(ElementRef::wrap)
            .any(|e| e.value().name() == "ul");
        if !has_separator {
            continue;
        }

        for child in cell.children() {
            if let Some(element) = ElementRef::wrap(child) {
                if element.value().name() == "ul" {
                    let indented = stripped_strings(element).join(" ");
                    if !indented.is_empty() {
                        if let Some(last) = paragraphs.last_mut() {
                            last.push(indented);
                        }
                    }
                    paragraphs.push(Vec::new());
                    continue;
                }
            }
            let Some(current) = paragraphs.last_mut() else {
                continue;
            };
            let text = match ElementRef::wrap(child) {
                Some(element) => inline_text(element),
                None => child
                    .value()
                    .as_text()
                    .map(|t| collapse_whitespace(t))
                    .unwrap_or_default(),
            };
            if !text.is_empty() {
                current.push(text);
            }
        }
    }

    paragraphs
        .into_iter()
        .map(|parts| parts.join(" "))
        .filter(|p| !p.trim().is_empty())
        .collect()
}
