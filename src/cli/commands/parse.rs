use std::fs;

use crate::cli::args::ParseArgs;
use crate::cli::OutputFormat;
use crate::decision::DecisionParser;
use crate::error::{CaseLawError, Result};
use crate::output::Formatter;

/// Parse a saved decision page offline and print the record
pub fn execute(args: ParseArgs, format: Option<OutputFormat>) -> Result<()> {
    let html = fs::read_to_string(&args.file)?;
    let uri = match args.uri {
        Some(uri) => uri,
        None => {
            let stem = args
                .file
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| CaseLawError::InvalidInput(format!("{} has no file name", args.file.display())))?;
            format!("/decision/{}", stem)
        }
    };

    let parsed = DecisionParser::new().parse(&html, &uri)?;
    log::info!(
        "Parsed {} as a {} page ({} malformed fields)",
        args.file.display(),
        parsed.era,
        parsed.malformed_fields
    );

    let formatter = Formatter::new(format.unwrap_or(OutputFormat::Json));
    println!("{}", formatter.format_decision(&parsed.record)?);
    Ok(())
}
