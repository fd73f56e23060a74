//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  No provider, UI or radio is required.

mod mock_ports;
mod session_tests;
