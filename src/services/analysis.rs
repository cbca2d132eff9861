//! Analysis service: validate a submitted URL, fetch it, analyze it.
//!
//! ERROR HANDLING
//! ==============
//! Every failure maps to one `AnalysisError` whose `Display` text is the
//! message shown to the user. Transport details stay in the logs.

use std::time::Instant;

use tracing::{info, warn};
use url::Url;

use crate::analyzer::{self, PageData};
use crate::error::ErrorCode;
use crate::fetch::{FetchError, PageFetcher};

const HTTP_OK: u16 = 200;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Please Enter a URL")]
    EmptyUrl,

    #[error("Invalid URL Format")]
    InvalidUrl(String),

    #[error("Failed to fetch URL")]
    Fetch(#[from] FetchError),

    #[error("HTTP Error {0}")]
    HttpStatus(u16),

    /// The blocking analysis task panicked or was cancelled.
    #[error("Failed to analyze page")]
    Worker(String),
}

impl ErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyUrl => "E_EMPTY_URL",
            Self::InvalidUrl(_) => "E_INVALID_URL",
            Self::Fetch(_) => "E_FETCH_FAILED",
            Self::HttpStatus(_) => "E_HTTP_STATUS",
            Self::Worker(_) => "E_ANALYSIS_WORKER",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.retryable(),
            Self::HttpStatus(status) => matches!(status, 429 | 500..=599),
            Self::EmptyUrl | Self::InvalidUrl(_) | Self::Worker(_) => false,
        }
    }
}

/// Validate user input as an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns `EmptyUrl` for blank input and `InvalidUrl` for anything that is
/// not an absolute http(s) URL.
pub fn parse_target_url(raw: &str) -> Result<Url, AnalysisError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyUrl);
    }
    let url = Url::parse(trimmed).map_err(|_| AnalysisError::InvalidUrl(trimmed.to_owned()))?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(AnalysisError::InvalidUrl(trimmed.to_owned()));
    }
    Ok(url)
}

/// Fetch and analyze the page behind `raw_url`.
///
/// # Errors
///
/// See [`AnalysisError`].
pub async fn analyze_url(fetcher: &dyn PageFetcher, raw_url: &str) -> Result<PageData, AnalysisError> {
    let started = Instant::now();
    let url = parse_target_url(raw_url)?;

    info!(%url, "fetching page");
    let fetched = fetcher.fetch(&url).await.inspect_err(|e| {
        warn!(%url, error = %e, "page fetch failed");
    })?;

    if fetched.status != HTTP_OK {
        warn!(%url, status = fetched.status, "page returned non-success status");
        return Err(AnalysisError::HttpStatus(fetched.status));
    }

    // CPU-bound on large bodies; runs on the blocking pool.
    let mut page = tokio::task::spawn_blocking(move || analyzer::analyze_html(&fetched.body, &fetched.final_url))
        .await
        .map_err(|e| {
            warn!(%url, error = %e, "analysis task failed");
            AnalysisError::Worker(e.to_string())
        })?;
    page.url = raw_url.trim().to_owned();

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(
        %url,
        elapsed_ms,
        internal_links = page.internal_links,
        external_links = page.external_links,
        "analysis completed"
    );
    Ok(page)
}

#[cfg(test)]
#[path = "analysis_test.rs"]
mod tests;
