use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::courts::CourtKind;
use crate::search::SearchCriteria;

/// Accepts `dd/mm/yyyy` as the site's form does, or ISO `yyyy-mm-dd`
fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| format!("'{}' is not a date (use dd/mm/yyyy or yyyy-mm-dd)", value))
}

/// List command arguments
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Which list to print
    #[arg(value_enum)]
    pub kind: CourtKind,
}

/// Search command arguments
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Full text search
    #[arg(long)]
    pub body: Option<String>,

    /// Case name
    #[arg(long)]
    pub title: Option<String>,

    /// Judicial officer
    #[arg(long)]
    pub before: Option<String>,

    #[arg(long)]
    pub catchwords: Option<String>,

    #[arg(long)]
    pub party: Option<String>,

    /// Medium neutral citation, including the year in square brackets
    #[arg(long)]
    pub citation: Option<String>,

    /// Earliest decision date
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Latest decision date
    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,

    #[arg(long)]
    pub file_number: Option<String>,

    #[arg(long)]
    pub legislation_cited: Option<String>,

    #[arg(long)]
    pub cases_cited: Option<String>,

    /// Court index numbers (see `nswcaselaw list courts`)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub courts: Vec<usize>,

    /// Tribunal index numbers (see `nswcaselaw list tribunals`)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub tribunals: Vec<usize>,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Seconds to wait between requests (overrides site.pause_secs)
    #[arg(long)]
    pub pause: Option<u64>,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save each decision as JSON in this directory
    #[arg(short, long)]
    pub download: Option<PathBuf>,

    /// Save the raw HTML of each downloaded decision in this directory
    #[arg(long, requires = "download")]
    pub dump: Option<PathBuf>,

    /// Read court and tribunal ids from the live search form
    #[arg(long)]
    pub refresh_courts: bool,
}

impl SearchArgs {
    pub fn has_jurisdiction(&self) -> bool {
        !(self.courts.is_empty() && self.tribunals.is_empty())
    }

    pub fn to_criteria(&self, pause: Duration) -> SearchCriteria {
        SearchCriteria {
            body: self.body.clone(),
            title: self.title.clone(),
            before: self.before.clone(),
            catchwords: self.catchwords.clone(),
            party: self.party.clone(),
            citation: self.citation.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            file_number: self.file_number.clone(),
            legislation_cited: self.legislation_cited.clone(),
            cases_cited: self.cases_cited.clone(),
            courts: self.courts.clone(),
            tribunals: self.tribunals.clone(),
            pause,
            limit: self.limit,
        }
    }
}

/// Fetch command arguments
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// CSV file containing decision URLs in any column
    #[arg(short, long)]
    pub uris: PathBuf,

    /// Save each decision as JSON in this directory
    #[arg(short, long)]
    pub download: PathBuf,

    /// Save the raw HTML of each decision in this directory
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Maximum number of decisions
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Seconds to wait between requests (overrides site.pause_secs)
    #[arg(long)]
    pub pause: Option<u64>,

    /// Write the decision summary CSV to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Parse command arguments
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Saved decision HTML
    pub file: PathBuf,

    /// Decision reference to record (defaults to /decision/<file stem>)
    #[arg(long)]
    pub uri: Option<String>,
}

/// Courts command arguments
#[derive(Args, Debug)]
pub struct CourtsArgs {
    /// Fetch the lists from the site's advanced search form
    #[arg(long)]
    pub refresh: bool,
}

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key (site.base_url, site.pause_secs, http.timeout_secs, http.user_agent)
        key: String,
        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show configuration file path
    Path,

    /// Initialize configuration
    Init,
}
