use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use url::Url;

use crate::cli::OutputFormat;
use crate::courts::{CourtEntry, CourtKind};
use crate::decision::{decision_url, DecisionRecord};
use crate::error::{CaseLawError, Result};
use crate::search::ResultStub;

/// Columns of the search results CSV
pub const STUB_CSV_HEADER: [&str; 6] = ["title", "court", "decisionDate", "url", "before", "catchwords"];

/// Columns of the decision summary CSV
pub const DECISION_CSV_HEADER: [&str; 16] = [
    "title",
    "uri",
    "decisionDate",
    "mnc",
    "before",
    "catchwords",
    "hearingDates",
    "dateOfOrders",
    "jurisdiction",
    "decision",
    "legislationCited",
    "casesCited",
    "parties",
    "category",
    "fileNumber",
    "representation",
];

/// Printed after court listings: only Supreme Court pages have been checked
pub const SCRAPER_WARNING: &str = "Warning: downloading full decisions has only been tested on the \
Supreme Court. While results can be downloaded for other courts and tribunals, full decisions \
may not parse.";

pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a batch of search results
    pub fn format_stubs(&self, stubs: &[ResultStub], base_url: &Url) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_stubs_table(stubs)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(stubs)?),
            OutputFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                if !stubs.is_empty() {
                    wtr.write_record(STUB_CSV_HEADER)?;
                }
                for stub in stubs {
                    wtr.write_record(stub_row(stub, base_url)?)?;
                }
                into_string(wtr)
            }
        }
    }

    /// Format a single parsed decision
    pub fn format_decision(&self, record: &DecisionRecord) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_decision_table(record)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(DECISION_CSV_HEADER)?;
                wtr.write_record(decision_row(record))?;
                into_string(wtr)
            }
        }
    }

    /// Format the numbered court or tribunal list
    pub fn format_courts(&self, kind: CourtKind, entries: &[CourtEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
            OutputFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(["index", "id", "name"])?;
                for (idx, entry) in entries.iter().enumerate() {
                    wtr.write_record([(idx + 1).to_string(), entry.id.clone(), entry.name.clone()])?;
                }
                into_string(wtr)
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table.set_header(vec![
                    Cell::new("#").fg(Color::Cyan),
                    Cell::new(match kind {
                        CourtKind::Courts => "Court",
                        CourtKind::Tribunals => "Tribunal",
                    })
                    .fg(Color::Cyan),
                ]);
                for (idx, entry) in entries.iter().enumerate() {
                    table.add_row(vec![Cell::new(idx + 1), Cell::new(&entry.name)]);
                }
                table.set_content_arrangement(ContentArrangement::Dynamic);
                Ok(table.to_string())
            }
        }
    }

    fn format_stubs_table(&self, stubs: &[ResultStub]) -> String {
        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Court").fg(Color::Cyan),
            Cell::new("Decision date").fg(Color::Cyan),
            Cell::new("Reference").fg(Color::Cyan),
        ]);

        for (idx, stub) in stubs.iter().enumerate() {
            table.add_row(vec![
                Cell::new(idx + 1),
                Cell::new(truncate_string(&stub.title, 60)),
                Cell::new(truncate_string(&stub.court, 30)),
                Cell::new(
                    stub.decision_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(&stub.uri),
            ]);
        }
        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut result = format!(
            "\n{} Results: {}\n\n",
            "📊".cyan(),
            stubs.len().to_string().yellow()
        );
        result.push_str(&table.to_string());
        result
    }

    fn format_decision_table(&self, record: &DecisionRecord) -> String {
        let mut result = String::new();

        result.push_str(&format!("\n{} {}\n", "⚖️".cyan(), record.title.bold()));
        result.push_str(&"=".repeat(80));
        result.push('\n');

        let mut line = |label: &str, value: Option<String>| {
            if let Some(value) = value {
                result.push_str(&format!("{}: {}\n", label.bold(), value));
            }
        };
        line("Court", Some(record.court.clone()));
        line("Reference", Some(record.uri.clone()));
        line("Citation", record.citation.clone());
        line("Decision date", record.decision_date.map(|d| d.to_string()));
        line("Hearing dates", record.hearing_dates.clone());
        line("Before", record.before.clone());
        line("Jurisdiction", record.jurisdiction.clone());
        line("Category", record.category.clone());
        line("File number", record.file_number.clone());
        line("Catchwords", record.catchwords.as_ref().map(|c| c.join(" - ")));
        line("Parties", record.parties.as_ref().map(|p| p.join("; ")));
        if let Some(appeal) = &record.decision_under_appeal {
            line(
                "Decision under appeal",
                Some(
                    [appeal.court.as_deref(), appeal.citation.as_deref(), appeal.before.as_deref()]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
            );
        }

        if let Some(judgment) = &record.judgment {
            result.push_str(&"-".repeat(80));
            result.push('\n');
            result.push_str(&format!(
                "{} Judgment ({} paragraphs)\n",
                "📋".cyan(),
                judgment.len()
            ));
            for paragraph in judgment.iter().take(3) {
                result.push_str(&format!("  {}\n", truncate_string(paragraph, 76)));
            }
        }

        result
    }
}

/// CSV fields for one search result; the url column is absolute
pub fn stub_row(stub: &ResultStub, base_url: &Url) -> Result<[String; 6]> {
    Ok([
        stub.title.clone(),
        stub.court.clone(),
        stub.decision_date.map(|d| d.to_string()).unwrap_or_default(),
        decision_url(base_url, &stub.uri)?.to_string(),
        stub.before.clone().unwrap_or_default(),
        stub.catchwords.clone().unwrap_or_default(),
    ])
}

/// CSV fields for one decision, lists joined with "; " and newlines flattened
pub fn decision_row(record: &DecisionRecord) -> Vec<String> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let list = |value: &Option<Vec<String>>| value.as_ref().map(|v| v.join("; ")).unwrap_or_default();

    [
        record.title.clone(),
        record.uri.clone(),
        record.decision_date.map(|d| d.to_string()).unwrap_or_default(),
        text(&record.citation),
        text(&record.before),
        list(&record.catchwords),
        text(&record.hearing_dates),
        text(&record.date_of_orders),
        text(&record.jurisdiction),
        text(&record.decision),
        list(&record.legislation_cited),
        list(&record.cases_cited),
        list(&record.parties),
        text(&record.category),
        text(&record.file_number),
        list(&record.representation),
    ]
    .into_iter()
    .map(|value| value.replace('\n', " "))
    .collect()
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr
        .into_inner()
        .map_err(|e| CaseLawError::Io(e.into_error()))?;
    String::from_utf8(data).map_err(|e| CaseLawError::Parse(e.to_string()))
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
