//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that drives the public API against
//! mock port adapters. Everything runs on the host.

mod mock_ports;
mod reload_tests;
mod service_tests;
mod stalk_tests;
