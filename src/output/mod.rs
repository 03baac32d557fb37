//! Output module for crawl results and reporting
//!
//! This module handles:
//! - Writing normalized courses as a JSON file
//! - Page progress reporting
//! - End-of-run summaries

mod json;
mod progress;
mod summary;

pub use json::{render_courses, write_courses};
pub use progress::{ConsoleProgress, NoProgress, ProgressReporter};
pub use summary::{format_summary, CrawlSummary};
