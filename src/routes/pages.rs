//! HTML page handlers.
//!
//! Failed analyses redirect to the home page with the message in the
//! `error` query parameter (`303 See Other`), so a reload never re-submits
//! the form.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::gate::script;
use crate::render;
use crate::services::analysis;
use crate::state::AppState;

const INVALID_METHOD_MESSAGE: &str = "Invalid Request Method";

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    #[serde(default)]
    url: String,
}

/// `GET /` — the analyze form, optionally showing an error.
pub async fn home(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> Html<String> {
    info!("rendering home page");
    Html(render::home_page(&state.config.gate, query.error.as_deref()))
}

/// `GET /results?url=...`
pub async fn results_query(State(state): State<AppState>, Query(params): Query<AnalyzeParams>) -> Response {
    analyze_and_render(&state, &params.url).await
}

/// `POST /results` with form field `url`. This is what the gate submits.
pub async fn results_form(
    State(state): State<AppState>,
    form: Result<Form<AnalyzeParams>, FormRejection>,
) -> Response {
    let params = match form {
        Ok(Form(params)) => params,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable analyze form");
            AnalyzeParams::default()
        }
    };
    analyze_and_render(&state, &params.url).await
}

/// Any other method on `/results`.
pub async fn invalid_method() -> Response {
    warn!("invalid request method on /results");
    error_redirect(INVALID_METHOD_MESSAGE)
}

/// `GET /js/gate.js` — the browser rendition of the submission gate.
pub async fn gate_script(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        script::render(&state.config.gate),
    )
        .into_response()
}

async fn analyze_and_render(state: &AppState, raw_url: &str) -> Response {
    info!(url = raw_url, "received request for analysis");
    match analysis::analyze_url(state.fetcher.as_ref(), raw_url).await {
        Ok(page) => Html(render::results_page(&state.config.gate, &page)).into_response(),
        Err(e) => {
            warn!(url = raw_url, error = %e, code = e.error_code(), "analysis failed");
            error_redirect(&e.to_string())
        }
    }
}

/// `303` to `/?error=<message>`, form-urlencoded.
pub(crate) fn error_redirect(message: &str) -> Response {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("/?error={encoded}")).into_response()
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
