//! End-of-run crawl summary

use chrono::{DateTime, Utc};

/// Statistics for one completed crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub semester_id: u32,

    /// Row count reported by the probe
    pub total_rows: u64,

    /// Pages requested after the probe
    pub page_count: u32,

    /// Courses written to the output file
    pub records: usize,

    pub output_path: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Requests issued, counting the probe
    pub fn total_requests(&self) -> u32 {
        self.page_count.saturating_add(1)
    }

    /// True when the number of records matches what the probe announced
    pub fn is_consistent(&self) -> bool {
        self.records as u64 == self.total_rows
    }
}

/// Formats a summary as a short multi-line report
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("Semester: {}\n", summary.semester_id));
    out.push_str(&format!(
        "Rows reported: {} | Courses written: {}\n",
        summary.total_rows, summary.records
    ));
    out.push_str(&format!(
        "Requests: {} ({} pages + probe)\n",
        summary.total_requests(),
        summary.page_count
    ));
    out.push_str(&format!("Output: {}\n", summary.output_path));
    out.push_str(&format!(
        "Started: {} | Duration: {:.2}s",
        summary.started_at.to_rfc3339(),
        summary.duration_seconds()
    ));

    if !summary.is_consistent() {
        out.push_str("\nWarning: collection changed while crawling");
    }

    out
}
