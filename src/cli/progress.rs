//! Progress display for a batch download.

use indicatif::{ProgressBar, ProgressStyle};

use causelist::{DownloadError, ProgressSink};

use super::icons;

/// Progress bar that tracks a download batch.
///
/// The bar is created hidden and sized on the first report, since the total
/// is only known once links have been harvested.
pub struct FetchProgress {
    bar: ProgressBar,
    failures: usize,
}

impl FetchProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Self { bar, failures: 0 }
    }

    fn ensure_visible(&self, total: usize) {
        if self.bar.is_hidden() {
            self.bar
                .set_draw_target(indicatif::ProgressDrawTarget::stderr());
            self.bar.set_length(total as u64);
        }
    }

    /// Number of documents that failed.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for FetchProgress {
    fn on_progress(&mut self, index: usize, total: usize) {
        self.ensure_visible(total);
        self.bar.set_position(index as u64);
        self.bar
            .set_message(format!("Downloading {}/{} PDFs", index, total));
    }

    fn on_failure(&mut self, url: &str, error: &DownloadError) {
        self.failures += 1;
        let line = format!("{} {}: {}", icons::error(), url, error);
        if self.bar.is_hidden() {
            eprintln!("{}", line);
        } else {
            self.bar.println(line);
        }
    }
}
