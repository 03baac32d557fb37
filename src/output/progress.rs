//! Progress reporting for page fetches
//!
//! Reporters only observe a crawl; nothing they do feeds back into it.

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{msg} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]";

/// Receives page completion events during a crawl
///
/// Implementations are shared by all concurrent page requests of one crawl.
pub trait ProgressReporter: Send + Sync {
    /// Called once with the number of pages about to be fetched
    fn start(&self, total: u64);

    /// Called as pages finish
    fn advance(&self, n: u64);

    /// Called after the last page finished or the crawl failed
    fn finish(&self);
}

/// Progress bar drawn on stderr
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new(message: &str) -> Self {
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(0);
        bar.set_style(style);
        bar.set_message(message.to_string());
        Self { bar }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new("Fetching pages")
    }
}

impl ProgressReporter for ConsoleProgress {
    fn start(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn advance(&self, n: u64) {
        self.bar.inc(n);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}

/// Reporter that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _total: u64) {}

    fn advance(&self, _n: u64) {}

    fn finish(&self) {}
}
