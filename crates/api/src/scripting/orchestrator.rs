//! Central script orchestrator service.
//!
//! Coordinates allow-list lookup, the bash executor, and translation of
//! executor outcomes into an [`ExecutionResult`]. Held in
//! [`AppState`](crate::state::AppState) as an `Arc<ScriptOrchestrator>` and
//! built directly by `kortex-api run`.

use std::sync::Arc;
use std::time::Duration;

use kortex_core::error::CoreError;
use kortex_core::scripting::executor::{ScriptError, ScriptExecutor, ScriptInput};
use kortex_core::scripting::registry::ScriptRegistry;
use kortex_core::scripting::result::ExecutionResult;
use kortex_core::scripting::shell::ShellExecutor;

use crate::error::{AppError, AppResult};

/// Runs allow-listed scripts under a fixed timeout.
///
/// Every call spawns its own process; concurrent runs of the same script
/// are not deduplicated.
pub struct ScriptOrchestrator {
    registry: Arc<ScriptRegistry>,
    timeout: Duration,
    executor: ShellExecutor,
}

impl ScriptOrchestrator {
    pub fn new(registry: Arc<ScriptRegistry>, timeout: Duration) -> Self {
        Self {
            registry,
            timeout,
            executor: ShellExecutor,
        }
    }

    /// Run the script registered under `name`.
    ///
    /// Unknown names fail with `NotFound` before anything is spawned. A
    /// script that exits non-zero or times out still yields `Ok`; only
    /// faults in spawning or waiting on the process are errors.
    pub async fn run(&self, name: &str) -> AppResult<ExecutionResult> {
        // 1. Resolve through the allow-list.
        let script = self.registry.get(name).await?;

        // 2. Build absolute paths; the child runs inside the scripts dir.
        let script_path = absolute(&script.file_path)?;
        let scripts_dir = absolute(self.registry.scripts_dir())?;

        let input = ScriptInput {
            env_vars: vec![
                ("KORTEX_SCRIPT_NAME".to_string(), script.name.clone()),
                ("KORTEX_SCRIPTS_DIR".to_string(), scripts_dir.clone()),
            ],
            working_directory: Some(scripts_dir),
            timeout: self.timeout,
        };

        tracing::info!(script = name, file = %script_path, "Running script");

        // 3. Hand off to bash.
        let outcome = self.executor.execute(&script_path, input).await;

        // 4. Fold the outcome into a result.
        match outcome {
            Ok(output) => {
                let result = ExecutionResult::from_output(name, output);
                tracing::info!(
                    script = name,
                    exit_code = result.return_code,
                    duration_ms = result.duration_ms,
                    "Script finished",
                );
                Ok(result)
            }
            Err(ScriptError::Timeout {
                elapsed_ms,
                stdout,
                stderr,
            }) => {
                tracing::warn!(script = name, elapsed_ms, timed_out = true, "Script timed out");
                Ok(ExecutionResult::timed_out(
                    name,
                    self.timeout,
                    elapsed_ms,
                    stdout,
                    stderr,
                ))
            }
            // The file vanished between lookup and spawn.
            Err(ScriptError::NotFound(_)) => Err(CoreError::NotFound {
                entity: "script",
                key: name.to_string(),
            }
            .into()),
            Err(e @ ScriptError::Io(_)) => Err(AppError::InternalError(format!(
                "Failed to execute script '{name}': {e}"
            ))),
        }
    }
}

fn absolute(path: impl AsRef<std::path::Path>) -> AppResult<String> {
    let path = path.as_ref();
    std::path::absolute(path)
        .map(|p| p.display().to_string())
        .map_err(|e| AppError::InternalError(format!("Cannot resolve {}: {e}", path.display())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
