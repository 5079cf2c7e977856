//! Handlers for listing and running allow-listed scripts.

use axum::extract::{Path, Query, State};
use axum::Json;
use kortex_core::scripting::registry::ScriptDescriptor;
use kortex_core::scripting::result::ExecutionResult;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for the script list.
#[derive(Debug, Default, Deserialize)]
pub struct ScriptListQuery {
    /// Case-insensitive filter over name and description.
    pub q: Option<String>,
}

/// Body of `GET /api/scripts`.
#[derive(Debug, Serialize)]
pub struct ScriptListResponse {
    pub scripts: Vec<ScriptDescriptor>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/scripts
///
/// List allow-listed scripts with fresh file metadata.
pub async fn list_scripts(
    State(state): State<AppState>,
    Query(query): Query<ScriptListQuery>,
) -> Json<ScriptListResponse> {
    let scripts = match query.q.as_deref() {
        Some(q) => state.registry.search(q).await,
        None => state.registry.list().await,
    };
    Json(ScriptListResponse { scripts })
}

/// POST /api/scripts/{name}/run
///
/// Run a script and return its [`ExecutionResult`]. A failing or timed-out
/// script is still a 200; only unknown names (404) and service faults (500)
/// are errors.
pub async fn run_script(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ExecutionResult>> {
    let result = state.script_orchestrator.run(&name).await?;
    Ok(Json(result))
}
