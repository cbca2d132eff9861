//! Page fetching.
//!
//! DESIGN
//! ======
//! `PageFetcher` is the seam between the analysis service and the network,
//! so routes and services can be tested against a canned fetcher. The
//! production `HttpFetcher` wraps a shared `reqwest::Client` with request
//! and connect timeouts, and reads at most `max_body_bytes` of the body;
//! anything past the cap is dropped rather than failing the fetch.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// Connecting, sending, or receiving headers failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("response body read failed: {0}")]
    Body(String),
}

impl ErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_FETCH_REQUEST",
            Self::Body(_) => "E_FETCH_BODY",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Body(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    /// URL after redirects; used as the base for resolving relative links.
    pub final_url: Url,
    pub body: String,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

pub struct HttpFetcher {
    http: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
        Ok(Self { http, max_body_bytes: config.max_body_bytes })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let mut response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?
        {
            let remaining = self.max_body_bytes.saturating_sub(body.len());
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                warn!(url = %final_url, max_body_bytes = self.max_body_bytes, "response body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %final_url, status, bytes = body.len(), "page fetched");
        Ok(FetchedPage { status, final_url, body: String::from_utf8_lossy(&body).into_owned() })
    }
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
