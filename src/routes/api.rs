//! JSON analysis API.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ErrorCode;
use crate::services::analysis::{self, AnalysisError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub(crate) fn analysis_error_to_status(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::EmptyUrl | AnalysisError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        AnalysisError::Fetch(_) | AnalysisError::HttpStatus(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `POST /api/analyze` — `{"url": "..."}` in, `PageData` out.
pub async fn analyze(State(state): State<AppState>, Json(req): Json<AnalyzeRequest>) -> Response {
    match analysis::analyze_url(state.fetcher.as_ref(), &req.url).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            warn!(url = %req.url, error = %e, code = e.error_code(), "api analysis failed");
            let body = ErrorBody { error: e.error_code(), message: e.to_string() };
            (analysis_error_to_status(&e), Json(body)).into_response()
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
