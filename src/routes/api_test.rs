use super::*;
use crate::fetch::FetchError;
use crate::routes::app;
use crate::state::test_helpers::{MockFetcher, test_app_state};
use axum::body::Body;
use axum::http::{Request, header};
use std::sync::Arc;
use tower::ServiceExt;

async fn post_json(fetcher: Arc<MockFetcher>, body: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    let resp = app(test_app_state(fetcher)).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn analysis_error_to_status_maps_client_errors() {
    assert_eq!(analysis_error_to_status(&AnalysisError::EmptyUrl), StatusCode::BAD_REQUEST);
    assert_eq!(analysis_error_to_status(&AnalysisError::InvalidUrl("x".into())), StatusCode::BAD_REQUEST);
}

#[test]
fn analysis_error_to_status_maps_upstream_errors() {
    let fetch = AnalysisError::Fetch(FetchError::Request("refused".into()));
    assert_eq!(analysis_error_to_status(&fetch), StatusCode::BAD_GATEWAY);
    assert_eq!(analysis_error_to_status(&AnalysisError::HttpStatus(503)), StatusCode::BAD_GATEWAY);
}

#[test]
fn analysis_error_to_status_maps_worker_failure() {
    let err = AnalysisError::Worker("task panicked".into());
    assert_eq!(analysis_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn analyze_returns_page_data_json() {
    let html = r#"<!DOCTYPE html><title>Api</title><h2>a</h2><h2>b</h2><a href="/x">x</a>"#;
    let (status, json) = post_json(MockFetcher::page(html), r#"{"url":"https://example.com"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["url"], "https://example.com");
    assert_eq!(json["title"], "Api");
    assert_eq!(json["html_version"], "HTML5");
    assert_eq!(json["headings"]["h2"], 2);
    assert_eq!(json["internal_links"], 1);
    assert_eq!(json["external_links"], 0);
    assert_eq!(json["has_login_form"], false);
}

#[tokio::test]
async fn analyze_missing_doctype_serializes_null_version() {
    let (_, json) = post_json(MockFetcher::page("<p>plain</p>"), r#"{"url":"https://example.com"}"#).await;
    assert!(json["html_version"].is_null());
}

#[tokio::test]
async fn analyze_invalid_url_is_bad_request() {
    let (status, json) = post_json(MockFetcher::page(""), r#"{"url":"not a url"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "E_INVALID_URL");
    assert_eq!(json["message"], "Invalid URL Format");
}

#[tokio::test]
async fn analyze_upstream_status_is_bad_gateway() {
    let (status, json) = post_json(MockFetcher::status(404, ""), r#"{"url":"https://example.com/x"}"#).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "E_HTTP_STATUS");
    assert_eq!(json["message"], "HTTP Error 404");
}
