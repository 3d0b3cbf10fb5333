use colored::*;

use super::http_fetcher;
use crate::cli::args::CourtsArgs;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::courts::{CourtKind, CourtTable};
use crate::error::Result;
use crate::output::{Formatter, SCRAPER_WARNING};

/// Show both lists, from the live search form with `--refresh`
pub fn execute(args: CourtsArgs, format: Option<OutputFormat>) -> Result<()> {
    let table = if args.refresh {
        let config = Config::load()?;
        let fetcher = http_fetcher(&config)?;
        CourtTable::fetch(&fetcher, &config.base_url()?)?
    } else {
        CourtTable::builtin()
    };

    let format = format.unwrap_or(OutputFormat::Table);
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    let formatter = Formatter::new(format);
    for kind in [CourtKind::Courts, CourtKind::Tribunals] {
        if format == OutputFormat::Table {
            println!("\n{}", kind.form_field().to_uppercase().bold());
        }
        println!("{}", formatter.format_courts(kind, table.entries(kind))?);
    }
    if format == OutputFormat::Table {
        println!("\n{}", SCRAPER_WARNING.yellow());
    }

    if args.refresh && table != CourtTable::builtin() {
        log::warn!("The site's court list differs from the built-in list; use --refresh-courts when searching");
    }
    Ok(())
}
