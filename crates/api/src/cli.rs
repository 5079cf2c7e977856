//! Command-line surface of the `kortex-api` binary.
//!
//! With no subcommand the binary serves the dashboard. `list` and `run`
//! work against the same allow-list and orchestrator without starting a
//! server.

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use kortex_core::scripting::registry::ScriptRegistry;
use kortex_core::scripting::result::ExecutionResult;

const RULE: &str = "============================================================";

#[derive(Debug, Parser)]
#[command(name = "kortex-api", version)]
/// Kortex script dashboard server.
///
/// Runs the HTTP dashboard by default; `list` and `run` use the script
/// allow-list from the terminal.
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the HTTP dashboard (default).
    Serve,
    /// List the allow-listed scripts.
    List,
    /// Run an allow-listed script and print its output.
    Run {
        /// Script name as shown by `list`.
        name: String,
    },
}

impl Command {
    /// Default tracing filter when `RUST_LOG` is unset.
    ///
    /// Terminal commands stay quiet so their output is readable.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Command::Serve => "kortex_api=debug,kortex_core=debug,tower_http=debug",
            Command::List | Command::Run { .. } => "kortex_api=warn,kortex_core=warn",
        }
    }
}

/// Print a numbered table of the scripts present on disk.
pub async fn print_script_list(registry: &ScriptRegistry, out: &mut impl Write) -> io::Result<()> {
    let scripts = registry.list().await;
    if scripts.is_empty() {
        writeln!(
            out,
            "No allow-listed scripts found in {}",
            registry.scripts_dir().display()
        )?;
        return Ok(());
    }

    writeln!(out, "Available scripts ({} total):", scripts.len())?;
    writeln!(out, "{RULE}")?;
    for (i, script) in scripts.iter().enumerate() {
        writeln!(out, "{:2}. {:<20} - {}", i + 1, script.name, script.description)?;
    }
    writeln!(out)?;
    writeln!(out, "Use 'kortex-api run <name>' to execute a script")?;
    Ok(())
}

/// Print a run's output and outcome in the terminal layout.
pub fn print_run_result(result: &ExecutionResult, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Running script: {}", result.script_name)?;
    writeln!(out, "{RULE}")?;
    if !result.stdout.is_empty() {
        write!(out, "{}", result.stdout)?;
        if !result.stdout.ends_with('\n') {
            writeln!(out)?;
        }
    }
    if !result.stderr.is_empty() {
        writeln!(out, "STDERR:")?;
        write!(out, "{}", result.stderr)?;
        if !result.stderr.ends_with('\n') {
            writeln!(out)?;
        }
    }

    if result.is_success() {
        writeln!(
            out,
            "Script completed successfully (return code: {}, {} ms)",
            result.return_code, result.duration_ms
        )?;
    } else {
        writeln!(out, "Script failed with return code: {}", result.return_code)?;
        if let Some(message) = &result.error_message {
            writeln!(out, "Error: {message}")?;
        }
    }
    Ok(())
}

/// Process exit status mirroring the script's.
///
/// A failed run whose return code does not fit an exit status (killed,
/// timed out) maps to 1.
pub fn exit_status(result: &ExecutionResult) -> u8 {
    if result.is_success() {
        return 0;
    }
    u8::try_from(result.return_code)
        .ok()
        .filter(|code| *code != 0)
        .unwrap_or(1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use kortex_core::scripting::executor::ScriptOutput;

    use super::*;

    fn output(exit_code: i32, stdout: &str, stderr: &str) -> ScriptOutput {
        ScriptOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
            duration_ms: 12,
        }
    }

    fn render(result: &ExecutionResult) -> String {
        let mut buf = Vec::new();
        print_run_result(result, &mut buf).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["kortex-api"]).expect("parse");
        assert_eq!(cli.command, None);
    }

    #[test]
    fn run_takes_a_name() {
        let cli = Cli::try_parse_from(["kortex-api", "run", "hello_world"]).expect("parse");
        assert_eq!(
            cli.command,
            Some(Command::Run {
                name: "hello_world".to_string()
            })
        );
        assert!(Cli::try_parse_from(["kortex-api", "run"]).is_err());
    }

    #[test]
    fn successful_run_is_rendered_with_its_output() {
        let result = ExecutionResult::from_output("greet", output(0, "hello", ""));
        let text = render(&result);
        assert!(text.starts_with("Running script: greet\n"));
        assert!(text.contains("hello\n"));
        assert!(!text.contains("STDERR:"));
        assert!(text.contains("Script completed successfully (return code: 0, 12 ms)"));
        assert_eq!(exit_status(&result), 0);
    }

    #[test]
    fn failed_run_shows_stderr_and_error() {
        let result = ExecutionResult::from_output("fail", output(3, "", "broken\n"));
        let text = render(&result);
        assert!(text.contains("STDERR:\nbroken\n"));
        assert!(text.contains("Script failed with return code: 3"));
        assert!(text.contains("Error: Script failed with exit code 3"));
        assert_eq!(exit_status(&result), 3);
    }

    #[test]
    fn timed_out_run_exits_with_one() {
        let result = ExecutionResult::timed_out(
            "slow",
            Duration::from_secs(2),
            2000,
            String::new(),
            String::new(),
        );
        assert!(render(&result).contains("Error: Script execution timed out after 2 seconds"));
        assert_eq!(exit_status(&result), 1);
    }

    #[tokio::test]
    async fn list_prints_a_numbered_table() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("hello_world.sh"), "echo hi\n").expect("write");
        let registry = ScriptRegistry::new(dir.path());

        let mut buf = Vec::new();
        print_script_list(&registry, &mut buf).await.expect("write");
        let text = String::from_utf8(buf).expect("utf8");

        assert!(text.starts_with("Available scripts (1 total):\n"));
        assert!(text.contains(" 1. hello_world          - Prints a greeting"));
        assert!(!text.contains("verify_hello_world"));
    }

    #[tokio::test]
    async fn list_of_empty_dir_says_so() {
        let dir = tempfile::tempdir().expect("temp dir");
        let registry = ScriptRegistry::new(dir.path());

        let mut buf = Vec::new();
        print_script_list(&registry, &mut buf).await.expect("write");
        assert!(String::from_utf8(buf)
            .expect("utf8")
            .starts_with("No allow-listed scripts found in "));
    }
}
