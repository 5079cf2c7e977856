//! Unified script execution interface and shared types.
//!
//! Defines [`ScriptExecutor`], the trait script executors implement,
//! along with [`ScriptInput`], [`ScriptOutput`], and [`ScriptError`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters for a single script run.
#[derive(Debug, Clone)]
pub struct ScriptInput {
    /// Additional environment variables set for the child process.
    pub env_vars: Vec<(String, String)>,
    /// Working directory for the child process (uses current dir if `None`).
    pub working_directory: Option<String>,
    /// Maximum wall-clock time before the process group is killed.
    pub timeout: Duration,
}

/// Captured output from a script that ran to completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptOutput {
    /// Complete stdout captured from the process.
    pub stdout: String,
    /// Complete stderr captured from the process.
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Errors that can occur during script execution.
///
/// A non-zero exit is not an error here: it comes back as a
/// [`ScriptOutput`] and the caller decides what it means.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script file was not found at the specified path.
    #[error("Script not found: {0}")]
    NotFound(String),

    /// The script exceeded its configured timeout and was killed.
    #[error("Script timed out after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed wall-clock time before the process was killed.
        elapsed_ms: u64,
        /// Whatever stdout was buffered before the kill.
        stdout: String,
        /// Whatever stderr was buffered before the kill.
        stderr: String,
    },

    /// An I/O error occurred while spawning or waiting on the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait implemented by script executors.
///
/// Each executor receives a file path and run parameters, spawns the
/// appropriate interpreter, and returns structured output or an error.
pub trait ScriptExecutor: Send + Sync {
    /// Execute the script at `script_path` with the given `input`.
    fn execute(
        &self,
        script_path: &str,
        input: ScriptInput,
    ) -> impl std::future::Future<Output = Result<ScriptOutput, ScriptError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
