//! Shell script executor.
//!
//! Spawns `bash` with the script path as its argument and captures
//! stdout/stderr.

use super::executor::{ScriptError, ScriptExecutor, ScriptInput, ScriptOutput};
use super::subprocess;

/// Executor for shell (bash) scripts.
pub struct ShellExecutor;

impl ScriptExecutor for ShellExecutor {
    async fn execute(
        &self,
        script_path: &str,
        input: ScriptInput,
    ) -> Result<ScriptOutput, ScriptError> {
        subprocess::ensure_script_file(script_path).await?;
        let mut cmd = tokio::process::Command::new("bash");
        cmd.arg(script_path);
        subprocess::run_command(&mut cmd, input).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;
    use crate::scripting::test_helpers::{default_input, write_temp_script};

    fn shell_script(body: &str) -> tempfile::NamedTempFile {
        write_temp_script(".sh", "#!/bin/bash", body)
    }

    #[tokio::test]
    async fn test_shell_stdout() {
        let script = shell_script("echo hello\n");
        let output = ShellExecutor
            .execute(script.path().to_str().expect("path"), default_input())
            .await
            .expect("execute");
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "hello\n");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_shell_env_vars() {
        let script = shell_script("echo $MY_VAR\n");
        let input = ScriptInput {
            env_vars: vec![("MY_VAR".to_string(), "hello_world".to_string())],
            working_directory: None,
            timeout: Duration::from_secs(5),
        };
        let output = ShellExecutor
            .execute(script.path().to_str().expect("path"), input)
            .await
            .expect("execute");
        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.contains("hello_world"));
    }

    #[tokio::test]
    async fn test_shell_nonzero_exit() {
        let script = shell_script("echo oops >&2\nexit 42\n");
        let output = ShellExecutor
            .execute(script.path().to_str().expect("path"), default_input())
            .await
            .expect("execute");
        assert_eq!(output.exit_code, 42);
        assert_eq!(output.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_shell_timeout() {
        let script = shell_script("sleep 60\n");
        let input = ScriptInput {
            env_vars: vec![],
            working_directory: None,
            timeout: Duration::from_millis(200),
        };
        let result = ShellExecutor
            .execute(script.path().to_str().expect("path"), input)
            .await;
        assert_matches!(result, Err(ScriptError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_shell_missing_file() {
        let result = ShellExecutor
            .execute("/no/such/script.sh", default_input())
            .await;
        assert_matches!(result, Err(ScriptError::NotFound(path)) if path == "/no/such/script.sh");
    }
}
