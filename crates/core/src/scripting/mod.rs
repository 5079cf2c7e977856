//! Allow-listed script registry and subprocess execution.
//!
//! Provides the fixed [`registry::ScriptRegistry`], the bash executor, and
//! the [`result::ExecutionResult`] returned to HTTP and CLI callers. All subprocess management is pure (no HTTP types) and lives
//! in the `core` crate for isolation and testability.

pub mod executor;
pub mod registry;
pub mod result;
pub mod shell;
pub mod subprocess;
