pub mod dashboard;
pub mod health;
pub mod scripts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /scripts                     list (GET, optional ?q= search)
/// /scripts/{name}/run          run an allow-listed script (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/scripts", scripts::router())
}
