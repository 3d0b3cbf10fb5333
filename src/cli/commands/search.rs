use std::sync::Arc;

use super::{http_fetcher, pause_for, ProgressSleeper};
use crate::bulk::{DownloadOptions, Downloader};
use crate::cli::args::SearchArgs;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::courts::CourtTable;
use crate::error::{CaseLawError, Result};
use crate::output::{output_stream, StubWriter};
use crate::progress::{messages, ProgressManager, RunProgress};
use crate::search::iterate;

/// Run a search, writing each result as it arrives and optionally
/// downloading the decision behind it
pub fn execute(args: SearchArgs, format: Option<OutputFormat>, quiet: bool, verbose: bool) -> Result<()> {
    if !args.has_jurisdiction() {
        return Err(CaseLawError::InvalidCriteria(
            "select at least one court or tribunal with --courts or --tribunals".to_string(),
        ));
    }

    let config = Config::load()?;
    let base_url = config.base_url()?;
    let pause = pause_for(args.pause, &config);
    let fetcher = http_fetcher(&config)?;

    let table = if args.refresh_courts {
        CourtTable::fetch(&fetcher, &base_url)?
    } else {
        CourtTable::builtin()
    };
    let criteria = args.to_criteria(pause);

    let progress = RunProgress::search(Arc::new(ProgressManager::new(quiet, verbose)));
    let sleeper = ProgressSleeper { progress: &progress };

    let mut results = iterate(&criteria, &table, &base_url, &fetcher, &sleeper)?;
    if args.refresh_courts {
        // The search form was fetched just now
        results = results.follows_request();
    }
    let mut writer = StubWriter::new(
        output_stream(args.output.as_deref())?,
        format.unwrap_or(OutputFormat::Csv),
        base_url.clone(),
    );
    let mut downloader = args.download.clone().map(|download_dir| {
        Downloader::new(
            &fetcher,
            &sleeper,
            base_url.clone(),
            DownloadOptions {
                download_dir,
                dump_dir: args.dump.clone(),
                pause,
            },
        )
        .follows_request()
    });

    let mut count = 0;
    let mut failure = None;
    while let Some(item) = results.next() {
        let stub = match item {
            Ok(stub) => stub,
            Err(e) => {
                failure = Some(e);
                break;
            }
        };
        writer.write(&stub)?;
        count += 1;
        progress.set_message(&messages::results_so_far(count, results.total_count()));

        if let Some(downloader) = downloader.as_mut() {
            if downloader.download(&stub.uri, Some(&stub)).is_ok() {
                progress.set_message(&messages::downloaded(&stub.title));
            }
        }
    }

    // Keep what was written before a transport failure
    writer.finish()?;
    progress.finish_and_clear();

    if results.skipped_rows() > 0 {
        log::warn!("Skipped {} malformed result row(s)", results.skipped_rows());
    }
    log::info!("{} result(s) from {} page(s)", count, results.pages_fetched());
    if let Some(downloader) = &downloader {
        let summary = downloader.summary();
        if summary.failed > 0 {
            eprintln!(
                "Downloaded {} decision(s), {} failed",
                summary.downloaded, summary.failed
            );
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
