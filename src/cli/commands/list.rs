use colored::*;

use crate::cli::args::ListArgs;
use crate::cli::OutputFormat;
use crate::courts::CourtTable;
use crate::error::Result;
use crate::output::{Formatter, SCRAPER_WARNING};

/// Print the built-in court or tribunal list with 1-based indices
pub fn execute(args: ListArgs, format: Option<OutputFormat>) -> Result<()> {
    let table = CourtTable::builtin();
    let format = format.unwrap_or(OutputFormat::Table);
    let formatter = Formatter::new(format);
    println!("{}", formatter.format_courts(args.kind, table.entries(args.kind))?);
    if format == OutputFormat::Table {
        println!("\n{}", SCRAPER_WARNING.yellow());
    }
    Ok(())
}
