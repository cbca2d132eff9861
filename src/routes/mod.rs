//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the HTML pages, the JSON API, the gate script and the
//! static asset directories under a single Axum router. Every request is
//! traced and responses are gzip-compressed when the client accepts it.

pub mod api;
pub mod pages;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::render::GATE_SCRIPT_PATH;
use crate::state::AppState;

/// JSON API routes, open to cross-origin callers.
fn api_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/analyze", post(api::analyze))
        .layer(cors)
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);
    let images_dir = ServeDir::new(&state.config.images_dir);

    Router::new()
        .route("/", get(pages::home))
        .route(
            "/results",
            get(pages::results_query)
                .post(pages::results_form)
                .fallback(pages::invalid_method),
        )
        .route(GATE_SCRIPT_PATH, get(pages::gate_script))
        .route("/healthz", get(healthz))
        .merge(api_routes())
        .nest_service("/static", static_dir)
        .nest_service("/images", images_dir)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
