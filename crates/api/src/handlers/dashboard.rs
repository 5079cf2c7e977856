//! Dashboard page, embedded assets, script source viewer, and the 404
//! fallback.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use kortex_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const NOT_FOUND_HTML: &str = include_str!("../../assets/404.html");
const DASHBOARD_JS: &str = include_str!("../../assets/dashboard.js");
const DASHBOARD_CSS: &str = include_str!("../../assets/dashboard.css");

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/dashboard.js
pub async fn dashboard_js() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/javascript; charset=utf-8")],
        DASHBOARD_JS,
    )
}

/// GET /static/dashboard.css
pub async fn dashboard_css() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], DASHBOARD_CSS)
}

/// GET /view/{name}
///
/// Raw source of an allow-listed script as plain text. Unknown names get a
/// plain-text 404 since this route is opened directly in the browser.
pub async fn view_script(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Response> {
    match state.registry.read_source(&name).await {
        Ok(source) => Ok(([(CONTENT_TYPE, TEXT_PLAIN)], source).into_response()),
        Err(CoreError::NotFound { .. }) => Ok((
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, TEXT_PLAIN)],
            format!("Unknown script: {name}"),
        )
            .into_response()),
        Err(e) => Err(AppError::Core(e)),
    }
}

/// Fallback for unmatched routes.
///
/// API clients get the usual JSON error body; browsers get an HTML page.
pub async fn not_found(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") || uri.path() == "/api" {
        let body = serde_json::json!({
            "error": "Endpoint not found",
            "code": "NOT_FOUND",
        });
        return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
    }
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
}
