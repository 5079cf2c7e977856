//! Browser-facing routes: the dashboard page, its assets, and script source.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Mount at the root.
///
/// ```text
/// GET    /                          -> index
/// GET    /view/{name}               -> view_script
/// GET    /static/dashboard.js       -> dashboard_js
/// GET    /static/dashboard.css      -> dashboard_css
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/view/{name}", get(dashboard::view_script))
        .route("/static/dashboard.js", get(dashboard::dashboard_js))
        .route("/static/dashboard.css", get(dashboard::dashboard_css))
}
