//! Paginated fetcher - probe, fan out, gather
//!
//! A crawl runs in three steps:
//! - A single-row probe request reads the collection's total row count
//! - One request per page is launched, all at once, over the shared client
//! - Results are gathered in page order; the first failure fails the crawl

use crate::crawler::fetcher::{ApiClient, PageRequest, RawRecord};
use crate::output::ProgressReporter;
use crate::state::FetchPhase;
use crate::{CrawlerError, Result};
use futures::future::try_join_all;

/// Number of pages needed to cover `total_rows` at `page_size` rows per page
///
/// # Example
///
/// ```
/// use course_crawler::crawler::page_count;
///
/// assert_eq!(page_count(2500, 1000), 3);
/// assert_eq!(page_count(0, 1000), 0);
/// ```
pub fn page_count(total_rows: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total_rows.div_ceil(size);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Result of a successful paginated fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    /// Row count reported by the probe
    pub total_rows: u64,

    /// Pages requested after the probe
    pub page_count: u32,

    /// Every record, page 1 first
    pub records: Vec<RawRecord>,
}

/// Drives one paginated fetch over an endpoint
pub struct Paginator {
    client: ApiClient,
    page_size: u32,
    phase: FetchPhase,
}

impl Paginator {
    /// Creates a paginator requesting `page_size` rows per page
    pub fn new(client: ApiClient, page_size: u32) -> Self {
        Self {
            client,
            page_size,
            phase: FetchPhase::Init,
        }
    }

    /// Current phase of the fetch
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Fetches every page of the collection
    ///
    /// The probe's own `data` is never reused: page 1 is fetched again at the
    /// real page size along with every other page. Each finished page advances
    /// `progress` by one. No partial result is returned on failure, and the
    /// remaining in-flight requests are dropped.
    ///
    /// # Returns
    ///
    /// * `Ok(FetchOutcome)` - All pages fetched, records in page order
    /// * `Err(CrawlerError)` - The probe or any page request failed
    pub async fn fetch_all(&mut self, progress: &dyn ProgressReporter) -> Result<FetchOutcome> {
        self.transition(FetchPhase::Probing)?;

        let total_rows = match self.client.fetch_total_rows(PageRequest::probe()).await {
            Ok(total_rows) => total_rows,
            Err(e) => {
                self.transition(FetchPhase::Failed)?;
                return Err(e);
            }
        };

        let pages = page_count(total_rows, self.page_size);
        tracing::info!(
            "{} rows reported, fetching {} pages of {}",
            total_rows,
            pages,
            self.page_size
        );
        self.transition(FetchPhase::Probed { page_count: pages })?;

        if pages == 0 {
            self.transition(FetchPhase::DoneEmpty)?;
            return Ok(FetchOutcome::default());
        }

        self.transition(FetchPhase::Fetching { pages })?;
        progress.start(u64::from(pages));

        let client = &self.client;
        let page_size = self.page_size;
        let tasks = (1..=pages).map(move |page| async move {
            let envelope = client.fetch_page(PageRequest::new(page, page_size)).await?;
            tracing::debug!("Page {} returned {} records", page, envelope.data.len());
            progress.advance(1);
            Ok::<_, CrawlerError>(envelope.data)
        });

        let gathered = try_join_all(tasks).await;
        progress.finish();

        let pages_data = match gathered {
            Ok(pages_data) => pages_data,
            Err(e) => {
                self.transition(FetchPhase::Failed)?;
                return Err(e);
            }
        };

        let records: Vec<RawRecord> = pages_data.into_iter().flatten().collect();
        if records.len() as u64 != total_rows {
            tracing::warn!(
                "Collection changed during crawl: probe reported {} rows, received {}",
                total_rows,
                records.len()
            );
        }

        self.transition(FetchPhase::Done)?;

        Ok(FetchOutcome {
            total_rows,
            page_count: pages,
            records,
        })
    }

    fn transition(&mut self, next: FetchPhase) -> Result<()> {
        if !self.phase.can_transition_to(&next) {
            return Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Fetch phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}
