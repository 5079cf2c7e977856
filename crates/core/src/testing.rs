//! Helpers shared by this crate's tests and downstream integration tests.
//!
//! Compiled for `cfg(test)` or with the `test-util` feature.

/// True while `pid` exists and is not a zombie.
///
/// Reads the state field of `/proc/{pid}/stat`.
#[cfg(target_os = "linux")]
pub fn process_running(pid: i32) -> bool {
    let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
        return false;
    };
    let state = stat
        .rsplit_once(')')
        .and_then(|(_, rest)| rest.trim_start().chars().next());
    !matches!(state, None | Some('Z') | Some('X'))
}
