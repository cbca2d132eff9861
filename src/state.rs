//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the typed configuration and the page fetcher behind its trait so
//! tests can swap in a canned fetcher.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::fetch::PageFetcher;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub fetcher: Arc<dyn PageFetcher>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { config: Arc::new(config), fetcher }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
