//! Script execution service.
//!
//! The [`orchestrator::ScriptOrchestrator`] ties the allow-list to the core
//! executors, providing a single entry point for running scripts.

pub mod orchestrator;
