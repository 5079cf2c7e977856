//! Domain logic for the Kortex dashboard.
//!
//! Pure arithmetic, the script allow-list, and subprocess execution live
//! here so both the HTTP server and the calculator CLI can share them
//! without pulling in any web dependencies.

pub mod calculator;
pub mod error;
pub mod scripting;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
