//! The structured outcome of a script run, as returned to HTTP callers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::executor::ScriptOutput;

/// Return code reported when the process did not exit on its own.
pub const KILLED_RETURN_CODE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub script_name: String,
    pub status: ExecutionStatus,
    pub return_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub error_message: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Result for a process that exited (normally or by signal).
    pub fn from_output(script_name: &str, output: ScriptOutput) -> Self {
        let (status, error_message) = if output.exit_code == 0 {
            (ExecutionStatus::Success, None)
        } else {
            (
                ExecutionStatus::Failure,
                Some(format!(
                    "Script failed with exit code {}",
                    output.exit_code
                )),
            )
        };

        Self {
            script_name: script_name.to_string(),
            status,
            return_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            error_message,
            duration_ms: output.duration_ms,
            timed_out: false,
        }
    }

    /// Result for a process killed at the deadline.
    pub fn timed_out(
        script_name: &str,
        timeout: Duration,
        elapsed_ms: u64,
        stdout: String,
        stderr: String,
    ) -> Self {
        Self {
            script_name: script_name.to_string(),
            status: ExecutionStatus::Failure,
            return_code: KILLED_RETURN_CODE,
            stdout,
            stderr,
            error_message: Some(format!(
                "Script execution timed out after {} seconds",
                timeout.as_secs_f64()
            )),
            duration_ms: elapsed_ms,
            timed_out: true,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
