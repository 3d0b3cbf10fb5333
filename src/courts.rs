//! Court and tribunal lookup used to validate and encode search criteria.
//!
//! Indices are 1-based, matching what `nswcaselaw list` prints.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{fetch_html, PageFetcher, SEARCH_PATH};
use crate::error::{CaseLawError, Result};
use crate::html::{selector, stripped_strings};

/// Which half of the lookup table an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CourtKind {
    Courts,
    Tribunals,
}

impl CourtKind {
    /// Name of the checkbox group on the advanced search form
    pub fn form_field(&self) -> &'static str {
        match self {
            Self::Courts => "courts",
            Self::Tribunals => "tribunals",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Courts => "court",
            Self::Tribunals => "tribunal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtEntry {
    /// Opaque id the search form submits
    pub id: String,
    pub name: String,
}

impl CourtEntry {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Ordered court and tribunal lists, loaded once before any search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtTable {
    pub courts: Vec<CourtEntry>,
    pub tribunals: Vec<CourtEntry>,
}

const BUILTIN_COURTS: &[(&str, &str)] = &[
    ("54a634063004de94513d827a", "Children's Court"),
    ("54a634063004de94513d827b", "Compensation Court"),
    ("54a634063004de94513d8278", "Court of Appeal"),
    ("54a634063004de94513d8279", "Court of Criminal Appeal"),
    ("54a634063004de94513d827c", "District Court"),
    ("54a634063004de94513d827d", "Drug Court"),
    ("54a634063004de94513d828e", "Industrial Court"),
    ("54a634063004de94513d8285", "Industrial Relations Commission (Commissioners)"),
    ("54a634063004de94513d827e", "Industrial Relations Commission (Judges)"),
    ("54a634063004de94513d827f", "Land and Environment Court (Commissioners)"),
    ("54a634063004de94513d8286", "Land and Environment Court (Judges)"),
    ("54a634063004de94513d8280", "Local Court"),
    ("54a634063004de94513d8281", "Supreme Court"),
];

const BUILTIN_TRIBUNALS: &[(&str, &str)] = &[
    ("54a634063004de94513d8282", "Administrative Decisions Tribunal (Appeal Panel)"),
    ("54a634063004de94513d8287", "Administrative Decisions Tribunal (Divisions)"),
    (
        "54a634063004de94513d8289",
        "Civil and Administrative Tribunal (Administrative and Equal Opportunity Division)",
    ),
    ("54a634063004de94513d828d", "Civil and Administrative Tribunal (Appeal Panel)"),
    (
        "54a634063004de94513d828b",
        "Civil and Administrative Tribunal (Consumer and Commercial Division)",
    ),
    ("173b71a8beab2951cc1fab8d", "Civil and Administrative Tribunal (Enforcement)"),
    ("54a634063004de94513d828c", "Civil and Administrative Tribunal (Guardianship Division)"),
    ("54a634063004de94513d828a", "Civil and Administrative Tribunal (Occupational Division)"),
    ("54a634063004de94513d8283", "Dust Diseases Tribunal"),
    ("1723173e41f6b6d63f2105d3", "Equal Opportunity Tribunal"),
    ("5e5c92e1e4b0c8604babc749", "Fair Trading Tribunal"),
    ("5e5c92c5e4b0c8604babc748", "Legal Services Tribunal"),
    ("54a634063004de94513d8284", "Medical Tribunal"),
    ("54a634063004de94513d8288", "Transport Appeal Boards"),
];

impl CourtTable {
    /// Snapshot of the advanced search form's checkboxes
    pub fn builtin() -> Self {
        let entries = |list: &[(&str, &str)]| {
            list.iter()
                .map(|(id, name)| CourtEntry::new(id, name))
                .collect::<Vec<_>>()
        };
        Self {
            courts: entries(BUILTIN_COURTS),
            tribunals: entries(BUILTIN_TRIBUNALS),
        }
    }

    /// Build the table from the advanced search form HTML.
    ///
    /// Each checkbox's label is the first text inside its parent element.
    pub fn from_search_form(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let read = |kind: CourtKind| -> Vec<CourtEntry> {
            let inputs = selector(&format!("input[name=\"{}\"]", kind.form_field()));
            document
                .select(&inputs)
                .filter_map(|input| {
                    let id = input.value().attr("value")?.trim().to_string();
                    let name = input
                        .parent()
                        .and_then(ElementRef::wrap)
                        .and_then(|parent| stripped_strings(parent).into_iter().next())?;
                    if id.is_empty() {
                        None
                    } else {
                        Some(CourtEntry { id, name })
                    }
                })
                .collect()
        };

        let table = Self {
            courts: read(CourtKind::Courts),
            tribunals: read(CourtKind::Tribunals),
        };
        if table.courts.is_empty() && table.tribunals.is_empty() {
            return Err(CaseLawError::Parse(
                "search form has no court or tribunal checkboxes".to_string(),
            ));
        }
        Ok(table)
    }

    /// Download the advanced search form and read its checkboxes
    pub fn fetch<F: PageFetcher + ?Sized>(fetcher: &F, base_url: &Url) -> Result<Self> {
        let url = base_url
            .join(SEARCH_PATH)
            .map_err(|e| CaseLawError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        let table = Self::from_search_form(&fetch_html(fetcher, &url)?)?;
        log::info!(
            "Loaded {} courts and {} tribunals from {}",
            table.courts.len(),
            table.tribunals.len(),
            url
        );
        Ok(table)
    }

    pub fn entries(&self, kind: CourtKind) -> &[CourtEntry] {
        match kind {
            CourtKind::Courts => &self.courts,
            CourtKind::Tribunals => &self.tribunals,
        }
    }

    /// Look up a 1-based index
    pub fn get(&self, kind: CourtKind, index: usize) -> Option<&CourtEntry> {
        index.checked_sub(1).and_then(|i| self.entries(kind).get(i))
    }
}

impl Default for CourtTable {
    fn default() -> Self {
        Self::builtin()
    }
}

static CITATION_ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d{4}\]\s*([A-Za-z]+)\s*\d+").expect("valid regex"));

/// Court or tribunal named by a medium neutral citation, e.g. `[2020] NSWSC 123`.
pub fn court_for_citation(citation: &str) -> Option<&'static str> {
    let abbreviation = CITATION_ABBREVIATION.captures(citation)?.get(1)?.as_str();
    court_for_abbreviation(abbreviation)
}

pub fn court_for_abbreviation(abbreviation: &str) -> Option<&'static str> {
    let name = match abbreviation {
        "NSWSC" => "Supreme Court",
        "NSWCA" => "Court of Appeal",
        "NSWCCA" => "Court of Criminal Appeal",
        "NSWDC" => "District Court",
        "NSWLC" => "Local Court",
        "NSWLEC" => "Land and Environment Court",
        "NSWChC" => "Children's Court",
        "NSWCC" => "Compensation Court",
        "NSWDRGC" => "Drug Court",
        "NSWIC" | "NSWIRComm" => "Industrial Relations Commission",
        "NSWADT" | "NSWADTAP" => "Administrative Decisions Tribunal",
        "NSWDDT" => "Dust Diseases Tribunal",
        "NSWMT" => "Medical Tribunal",
        other if other.starts_with("NSWCAT") => "Civil and Administrative Tribunal",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_indices_are_one_based() {
        let table = CourtTable::builtin();
        assert_eq!(table.get(CourtKind::Courts, 1).unwrap().name, "Children's Court");
        assert_eq!(table.get(CourtKind::Courts, 13).unwrap().name, "Supreme Court");
        assert!(table.get(CourtKind::Courts, 0).is_none());
        assert!(table.get(CourtKind::Courts, 14).is_none());
        assert_eq!(
            table.get(CourtKind::Tribunals, 14).unwrap().name,
            "Transport Appeal Boards"
        );
    }

    #[test]
    fn test_from_search_form() {
        let html = r#"
            <form>
              <div class="checkbox"><label><input type="checkbox" name="courts" value="c1"> Supreme Court </label></div>
              <div class="checkbox"><label><input type="checkbox" name="courts" value="c2">District Court</label></div>
              <input type="hidden" name="_courts" value="on">
              <div class="checkbox"><label><input type="checkbox" name="tribunals" value="t1">Medical Tribunal</label></div>
            </form>"#;
        let table = CourtTable::from_search_form(html).unwrap();
        assert_eq!(table.courts.len(), 2);
        assert_eq!(table.courts[0], CourtEntry::new("c1", "Supreme Court"));
        assert_eq!(table.tribunals, vec![CourtEntry::new("t1", "Medical Tribunal")]);
    }

    #[test]
    fn test_from_search_form_without_checkboxes() {
        let result = CourtTable::from_search_form("<html><body>maintenance</body></html>");
        assert!(matches!(result, Err(CaseLawError::Parse(_))));
    }

    #[test]
    fn test_court_for_citation() {
        assert_eq!(court_for_citation("Smith v Jones [2020] NSWSC 123"), Some("Supreme Court"));
        assert_eq!(court_for_citation("[2019] NSWCATAD 45"), Some("Civil and Administrative Tribunal"));
        assert_eq!(court_for_citation("[2004] HCA 12"), None);
        assert_eq!(court_for_citation("no citation here"), None);
    }
}
