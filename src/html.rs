//! Small text helpers shared by the listing and decision parsers.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Date layouts the site has used for decision dates
const DATE_FORMATS: &[&str] = &["%d %B %Y", "%e %B %Y", "%d %b %Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Compile a selector that is known at compile time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector {css:?}: {e}"))
}

/// Collapse runs of whitespace (including newlines and nbsp) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Trimmed, non-empty text nodes of an element in document order.
pub fn stripped_strings(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Elements that end the current line of a multi-value field
const LINE_BREAKING: &[&str] = &["br", "p", "div", "li", "tr"];

/// Text of a multi-value field, one entry per line.
///
/// Lines end at `<br>`, at block elements and at newlines in text. Inline
/// markup such as `<em>` or `<a>` stays part of the current line.
pub fn line_blocks(element: ElementRef<'_>) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    collect_lines(element, &mut current, &mut blocks);
    end_line(&mut current, &mut blocks);
    blocks
}

fn collect_lines(element: ElementRef<'_>, current: &mut String, blocks: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let mut lines = text.split('\n');
            if let Some(first) = lines.next() {
                current.push_str(first);
            }
            for line in lines {
                end_line(current, blocks);
                current.push_str(line);
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if name == "br" {
                end_line(current, blocks);
            } else if LINE_BREAKING.contains(&name) {
                end_line(current, blocks);
                collect_lines(child, current, blocks);
                end_line(current, blocks);
            } else {
                collect_lines(child, current, blocks);
            }
        }
    }
}

fn end_line(current: &mut String, blocks: &mut Vec<String>) {
    let line = collapse_whitespace(current);
    if !line.is_empty() {
        blocks.push(line);
    }
    current.clear();
}

/// All text of an element on one line.
pub fn inline_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// `None` for blank strings, trimmed text otherwise.
pub fn text_or_none(value: &str) -> Option<String> {
    let collapsed = collapse_whitespace(value);
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Normalise a field label: collapse whitespace and drop a trailing colon.
pub fn normalize_label(label: &str) -> String {
    let collapsed = collapse_whitespace(label);
    collapsed.trim_end_matches(':').trim_end().to_string()
}

/// Case-insensitive prefix test used for label vocabularies.
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Case-insensitive substring test used by the older page layout.
pub fn contains_ignore_case(text: &str, needle: &str) -> bool {
    text.to_ascii_uppercase().contains(&needle.to_ascii_uppercase())
}

/// Parse a decision date in any of the layouts the site renders.
pub fn parse_site_date(text: &str) -> Option<NaiveDate> {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&text, format).ok())
}
