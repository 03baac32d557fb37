//! Crawler module for paginated record fetching
//!
//! This module contains the core crawling logic, including:
//! - Endpoint resolution from the configured URL template
//! - HTTP fetching and page envelope decoding
//! - Count probing and concurrent page fan-out

mod endpoint;
mod fetcher;
mod paginator;

pub use endpoint::Endpoint;
pub use fetcher::{
    build_http_client, ApiClient, PageEnvelope, PageRequest, RawRecord, PAGE_QUERY_PARAM,
};
pub use paginator::{page_count, FetchOutcome, Paginator};

use crate::config::ApiConfig;
use crate::output::ProgressReporter;
use crate::Result;

/// Runs a complete paginated fetch for one semester
///
/// This is the main entry point for a crawl. It will:
/// 1. Resolve the endpoint for `semester_id`
/// 2. Build the shared HTTP client
/// 3. Probe the total row count
/// 4. Fetch every page concurrently and gather them in order
///
/// # Arguments
///
/// * `config` - The API configuration
/// * `semester_id` - Semester substituted into the URL template
/// * `progress` - Receives one event per finished page
///
/// # Returns
///
/// * `Ok(FetchOutcome)` - Every record, in page order
/// * `Err(CrawlerError)` - Any request failed
pub async fn crawl(
    config: &ApiConfig,
    semester_id: u32,
    progress: &dyn ProgressReporter,
) -> Result<FetchOutcome> {
    let endpoint = Endpoint::resolve(&config.url_template, semester_id)?;
    let client = ApiClient::new(build_http_client(config)?, endpoint);
    Paginator::new(client, config.page_size)
        .fetch_all(progress)
        .await
}
