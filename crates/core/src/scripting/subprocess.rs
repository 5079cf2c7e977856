//! Shared subprocess management utilities.
//!
//! Provides [`run_command`], the spawn + I/O + timeout handling behind the
//! executors. An executor builds the [`tokio::process::Command`] for its
//! interpreter and hands it over here.
//!
//! On Unix the child is placed in its own process group. A
//! [`ProcessGroupGuard`] kills that group when the run ends, however it
//! ends: normal exit, timeout, or the future being dropped mid-flight
//! (for example when the HTTP request that started it goes away).

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

use super::executor::{ScriptError, ScriptInput, ScriptOutput};

/// Maximum stdout or stderr size captured per stream (10 MiB).
///
/// Output past this limit is read and discarded so the child never blocks
/// on a full pipe.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// How long to wait for the output readers after the process group has
/// been killed.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Fail with [`ScriptError::NotFound`] unless `script_path` is a file.
pub async fn ensure_script_file(script_path: &str) -> Result<(), ScriptError> {
    match tokio::fs::metadata(script_path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(ScriptError::NotFound(script_path.to_string())),
    }
}

/// Spawn `cmd` as a child process, capture stdout/stderr, and enforce the
/// configured timeout.
///
/// The caller is responsible for setting the command program and arguments
/// before calling this function. Environment variables and working directory
/// from [`ScriptInput`] are applied here. Stdin is closed.
pub async fn run_command(
    cmd: &mut Command,
    input: ScriptInput,
) -> Result<ScriptOutput, ScriptError> {
    // `kill_on_drop(true)` covers the direct child; the group guard below
    // covers anything it spawned.
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    for (key, value) in &input.env_vars {
        cmd.env(key, value);
    }

    if let Some(dir) = &input.working_directory {
        cmd.current_dir(dir);
    }

    let start = Instant::now();

    let mut child = cmd.spawn()?;
    let mut group = ProcessGroupGuard::new(child.id());

    // Read stdout/stderr in spawned tasks so we can still call
    // `child.wait()` (which borrows `&mut child`).
    let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
    let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

    let wait_result = tokio::time::timeout(input.timeout, child.wait()).await;

    match wait_result {
        Ok(Ok(status)) => {
            let duration_ms = elapsed_ms(start);
            // Background processes left behind by the script would otherwise
            // hold the pipes open.
            group.kill();
            let stdout = collect(stdout_task).await;
            let stderr = collect(stderr_task).await;

            Ok(ScriptOutput {
                stdout,
                stderr,
                exit_code: status.code().unwrap_or(-1),
                duration_ms,
            })
        }
        Ok(Err(e)) => Err(ScriptError::Io(e)),
        Err(_elapsed) => {
            let elapsed_ms = elapsed_ms(start);
            group.kill();
            let _ = child.start_kill();
            // Reap the child so it does not linger as a zombie.
            let _ = tokio::time::timeout(DRAIN_GRACE, child.wait()).await;

            tracing::warn!(elapsed_ms, "Script timed out, process group killed");

            Err(ScriptError::Timeout {
                elapsed_ms,
                stdout: collect(stdout_task).await,
                stderr: collect(stderr_task).await,
            })
        }
    }
}

/// Kills a child's process group when dropped, unless already killed.
struct ProcessGroupGuard {
    pgid: Option<i32>,
}

impl ProcessGroupGuard {
    fn new(pid: Option<u32>) -> Self {
        Self {
            pgid: pid.and_then(|p| i32::try_from(p).ok()),
        }
    }

    /// Send SIGKILL to the whole group. Idempotent.
    fn kill(&mut self) {
        let Some(pgid) = self.pgid.take() else {
            return;
        };

        #[cfg(unix)]
        {
            // Safety: killpg only sends a signal. A group with no members
            // left yields ESRCH, which is ignored.
            let ret = unsafe { libc::killpg(pgid, libc::SIGKILL) };
            if ret != 0 {
                tracing::trace!(pgid, "Process group already gone");
            }
        }

        #[cfg(not(unix))]
        let _ = pgid;
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Join a reader task with a bounded wait and decode its bytes lossily.
async fn collect(task: JoinHandle<Vec<u8>>) -> String {
    let bytes = match tokio::time::timeout(DRAIN_GRACE, task).await {
        Ok(Ok(bytes)) => bytes,
        _ => Vec::new(),
    };
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
        let _ = tokio::io::copy(&mut h, &mut tokio::io::sink()).await;
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
