//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests against the lesson-search API:
//! - Building the shared HTTP client (user agent, timeouts, TLS posture)
//! - Issuing one `queryPage__` GET per page request
//! - Decoding the page envelope, or only its row count
//! - Error classification (transport, timeout, status, protocol)

use crate::config::ApiConfig;
use crate::crawler::endpoint::Endpoint;
use crate::{CrawlerError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// Query parameter carrying `"<page>,<size>"`
pub const PAGE_QUERY_PARAM: &str = "queryPage__";

/// An untyped record exactly as the API returned it
pub type RawRecord = Map<String, Value>;

/// One page to request, addressed by a 1-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// The single-row request used to learn the total row count
    pub fn probe() -> Self {
        Self::new(1, 1)
    }

    /// Value of the `queryPage__` parameter
    pub fn query_value(&self) -> String {
        format!("{},{}", self.page, self.size)
    }
}

/// Decoded response body of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageEnvelope {
    /// Row count of the whole collection at the time of the request
    pub total_rows: u64,

    /// Records on this page, in server order
    pub data: Vec<RawRecord>,
}

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(rename = "_page_")]
    page: WirePageInfo,
    data: Vec<RawRecord>,
}

#[derive(Deserialize)]
struct WireProbe {
    #[serde(rename = "_page_")]
    page: WirePageInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePageInfo {
    total_rows: u64,
}

/// Reads `_page_.totalRows` from a response body, ignoring `data` entirely
pub fn total_rows_from_slice(body: &[u8]) -> std::result::Result<u64, serde_json::Error> {
    let wire: WireProbe = serde_json::from_slice(body)?;
    Ok(wire.page.total_rows)
}

impl PageEnvelope {
    /// Decodes an envelope from a response body
    ///
    /// Fails when `_page_.totalRows` or `data` is missing or mistyped.
    pub fn from_slice(body: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        let wire: WireEnvelope = serde_json::from_slice(body)?;
        Ok(Self {
            total_rows: wire.page.total_rows,
            data: wire.data,
        })
    }
}

/// Builds the HTTP client shared by every request of a crawl
///
/// When `accept_invalid_certs` is set, both the certificate chain and the
/// hostname go unchecked.
pub fn build_http_client(config: &ApiConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()?;

    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled");
    }

    Ok(client)
}

/// Page-level client for one endpoint
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: Endpoint,
}

impl ApiClient {
    pub fn new(client: Client, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Fetches and decodes one page
    ///
    /// # Error Classification
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Request timed out | `Timeout` |
    /// | Connection/TLS/body read failure | `Transport` |
    /// | Non-2xx status | `Status` |
    /// | Body is not a page envelope | `Protocol` |
    ///
    /// Nothing is retried.
    pub async fn fetch_page(&self, request: PageRequest) -> Result<PageEnvelope> {
        let body = self.get(request).await?;

        PageEnvelope::from_slice(&body).map_err(|e| CrawlerError::Protocol {
            url: self.endpoint.url().to_string(),
            message: format!("page {}: {}", request.page, e),
        })
    }

    /// Requests one page and returns only the reported total row count
    ///
    /// The body's `data` segment is never decoded, so a response with a null
    /// or odd `data` still succeeds. Errors are classified as in
    /// [`ApiClient::fetch_page`].
    pub async fn fetch_total_rows(&self, request: PageRequest) -> Result<u64> {
        let body = self.get(request).await?;

        total_rows_from_slice(&body).map_err(|e| CrawlerError::Protocol {
            url: self.endpoint.url().to_string(),
            message: format!("row count: {}", e),
        })
    }

    async fn get(&self, request: PageRequest) -> Result<Vec<u8>> {
        let url = self.endpoint.url().as_str();
        tracing::trace!("GET {} {}={}", url, PAGE_QUERY_PARAM, request.query_value());

        let response = self
            .client
            .get(self.endpoint.url().clone())
            .query(&[(PAGE_QUERY_PARAM, request.query_value())])
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(url, e))?;
        Ok(body.to_vec())
    }
}

fn classify_transport_error(url: &str, error: reqwest::Error) -> CrawlerError {
    if error.is_timeout() {
        CrawlerError::Timeout {
            url: url.to_string(),
        }
    } else {
        CrawlerError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
