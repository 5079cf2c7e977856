use std::sync::Arc;

use kortex_core::scripting::registry::ScriptRegistry;

use crate::config::ServerConfig;
use crate::scripting::orchestrator::ScriptOrchestrator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Everything in here is read-only after startup; cloning only bumps
/// reference counts.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The script allow-list.
    pub registry: Arc<ScriptRegistry>,
    /// Runs allow-listed scripts.
    pub script_orchestrator: Arc<ScriptOrchestrator>,
}

impl AppState {
    /// Wire up state from configuration and a registry.
    pub fn new(config: ServerConfig, registry: ScriptRegistry) -> Self {
        let registry = Arc::new(registry);
        let script_orchestrator = Arc::new(ScriptOrchestrator::new(
            Arc::clone(&registry),
            config.script_timeout(),
        ));
        Self {
            config: Arc::new(config),
            registry,
            script_orchestrator,
        }
    }
}
