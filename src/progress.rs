use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

/// Progress indicator manager
pub struct ProgressManager {
    multi: Arc<MultiProgress>,
    enabled: bool,
    verbose: bool,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(quiet: bool, verbose: bool) -> Self {
        // Spinners would corrupt piped CSV output
        let enabled = !quiet && io::stdout().is_terminal() && io::stderr().is_terminal();

        Self {
            multi: Arc::new(MultiProgress::new()),
            enabled,
            verbose,
        }
    }

    /// Create a spinner for paging through results
    pub fn create_search_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style.tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Some(pb)
    }

    /// Create a progress bar for a known number of decision downloads
    pub fn create_download_progress(&self, total: u64) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new(total));
        if let Ok(style) =
            ProgressStyle::default_bar().template("{msg}\n{bar:40.green/white} {pos}/{len} ({eta})")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb.set_message(messages::DOWNLOADING);

        Some(pb)
    }

    /// Show a simple message (for verbose mode)
    pub fn show_message(&self, message: &str) {
        if self.verbose && self.enabled {
            eprintln!("🔍 {}", message);
        }
    }

    /// Check if progress is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Spinner that follows one search or download run
pub struct RunProgress {
    bar: Option<ProgressBar>,
    manager: Arc<ProgressManager>,
}

impl RunProgress {
    /// Spinner for an open-ended search
    pub fn search(manager: Arc<ProgressManager>) -> Self {
        let bar = manager.create_search_spinner(messages::SEARCHING);
        Self { bar, manager }
    }

    /// Bar for a batch of `total` decisions
    pub fn downloads(manager: Arc<ProgressManager>, total: u64) -> Self {
        let bar = manager.create_download_progress(total);
        Self { bar, manager }
    }

    /// Update the progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.bar {
            pb.set_message(message.to_string());
        }
        self.manager.show_message(message);
    }

    pub fn inc(&self) {
        if let Some(ref pb) = self.bar {
            pb.inc(1);
        }
    }

    /// Finish with a success message
    pub fn finish_with_message(&self, message: &str) {
        if let Some(ref pb) = self.bar {
            pb.finish_with_message(format!("✅ {}", message));
        }
        self.manager.show_message(&format!("Done: {}", message));
    }

    /// Finish and clear the progress
    pub fn finish_and_clear(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

impl Drop for RunProgress {
    fn drop(&mut self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

/// Progress messages for different operations
pub mod messages {
    pub const SEARCHING: &str = "Searching...";
    pub const DOWNLOADING: &str = "Downloading decisions...";

    pub fn results_so_far(count: usize, total: Option<u64>) -> String {
        match total {
            Some(total) => format!("{} of {} results", count, total),
            None => format!("{} results", count),
        }
    }

    pub fn waiting(seconds: u64) -> String {
        format!("Waiting {}s before the next request", seconds)
    }

    pub fn downloaded(title: &str) -> String {
        format!("Downloaded {}", title)
    }
}
