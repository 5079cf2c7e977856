//! Integration tests for the browser-facing pages, assets, and fallback.

mod common;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use common::{body_json, body_text, get};

fn content_type(response: &axum::http::Response<axum::body::Body>) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn index_serves_dashboard_html() {
    let response = get(common::build_test_app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains("/static/dashboard.js"));
    assert!(html.contains("id=\"script-list\""));
}

#[tokio::test]
async fn static_assets_have_correct_content_types() {
    let js = get(common::build_test_app(), "/static/dashboard.js").await;
    assert_eq!(js.status(), StatusCode::OK);
    assert!(content_type(&js).starts_with("text/javascript"));
    assert!(body_text(js).await.contains("/api/scripts"));

    let css = get(common::build_test_app(), "/static/dashboard.css").await;
    assert_eq!(css.status(), StatusCode::OK);
    assert!(content_type(&css).starts_with("text/css"));
}

#[tokio::test]
async fn view_returns_script_source_as_plain_text() {
    let response = get(common::build_test_app(), "/view/hello_world").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/plain"));

    let source = body_text(response).await;
    assert!(source.starts_with("#!"));
    assert!(source.contains("Hello from Kortex"));
}

#[tokio::test]
async fn view_unknown_script_is_plain_text_404() {
    let response = get(common::build_test_app(), "/view/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(content_type(&response).starts_with("text/plain"));
    assert_eq!(body_text(response).await, "Unknown script: nope");
}

#[tokio::test]
async fn unknown_page_gets_html_404() {
    let response = get(common::build_test_app(), "/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(content_type(&response).starts_with("text/html"));
}

#[tokio::test]
async fn unknown_api_route_gets_json_404() {
    let response = get(common::build_test_app(), "/api/unknown").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Endpoint not found");
}
