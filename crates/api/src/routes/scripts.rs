//! Route definitions for script endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scripts;
use crate::state::AppState;

/// Routes mounted at `/api/scripts`.
///
/// ```text
/// GET    /                          -> list_scripts
/// POST   /{name}/run                -> run_script
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scripts::list_scripts))
        .route("/{name}/run", post(scripts::run_script))
}
