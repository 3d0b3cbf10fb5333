pub mod config;
pub mod courts;
pub mod fetch;
pub mod list;
pub mod parse;
pub mod search;
pub mod version;

use std::time::Duration;

use crate::api::HttpFetcher;
use crate::config::Config;
use crate::error::Result;
use crate::progress::{messages, RunProgress};
use crate::search::{Sleeper, ThreadSleeper};

/// Blocking HTTP client built from the loaded configuration
fn http_fetcher(config: &Config) -> Result<HttpFetcher> {
    HttpFetcher::new(&config.client_config())
}

/// `--pause` when given, otherwise the configured pause
fn pause_for(flag: Option<u64>, config: &Config) -> Duration {
    flag.map(Duration::from_secs).unwrap_or_else(|| config.pause())
}

/// Sleeps the thread and shows the wait on the progress spinner
struct ProgressSleeper<'a> {
    progress: &'a RunProgress,
}

impl Sleeper for ProgressSleeper<'_> {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            self.progress.set_message(&messages::waiting(duration.as_secs()));
        }
        ThreadSleeper.sleep(duration);
    }
}
