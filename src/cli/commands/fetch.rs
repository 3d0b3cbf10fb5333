use std::sync::Arc;

use super::{http_fetcher, pause_for, ProgressSleeper};
use crate::bulk::{load_uris_from_csv, DownloadOptions, Downloader};
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::{CaseLawError, Result};
use crate::output::{output_stream, DecisionCsvWriter};
use crate::progress::{messages, ProgressManager, RunProgress};

/// Download every decision referenced in a CSV file and write a summary row
/// for each one that parses
pub fn execute(args: FetchArgs, quiet: bool, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let base_url = config.base_url()?;

    let mut uris = load_uris_from_csv(&args.uris, &base_url)?;
    if uris.is_empty() {
        return Err(CaseLawError::InvalidInput(format!(
            "no decision URLs found in {}",
            args.uris.display()
        )));
    }
    if let Some(limit) = args.limit {
        uris.truncate(limit);
    }

    let fetcher = http_fetcher(&config)?;
    let progress = RunProgress::downloads(Arc::new(ProgressManager::new(quiet, verbose)), uris.len() as u64);
    let sleeper = ProgressSleeper { progress: &progress };
    let mut downloader = Downloader::new(
        &fetcher,
        &sleeper,
        base_url,
        DownloadOptions {
            download_dir: args.download.clone(),
            dump_dir: args.dump.clone(),
            pause: pause_for(args.pause, &config),
        },
    );
    let mut writer = DecisionCsvWriter::new(output_stream(args.output.as_deref())?);

    for uri in &uris {
        if let Ok(parsed) = downloader.download(uri, None) {
            writer.write(&parsed.record)?;
            progress.set_message(&messages::downloaded(&parsed.record.title));
        }
        progress.inc();
    }
    writer.finish()?;

    let summary = downloader.summary();
    progress.finish_with_message(&format!(
        "{} of {} decision(s) downloaded",
        summary.downloaded,
        uris.len()
    ));
    if summary.failed > 0 {
        eprintln!("{} decision(s) could not be downloaded; see the log for details", summary.failed);
    }
    if summary.malformed_fields > 0 {
        log::warn!("{} malformed field(s) across all decisions", summary.malformed_fields);
    }
    Ok(())
}
