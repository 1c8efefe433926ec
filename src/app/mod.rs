//! Application core: pure domain orchestration, zero I/O.
//!
//! Ties the cruise setpoint controller, the longitudinal controller and the
//! plot recorder together behind one per-tick call. Configuration comes in
//! and events go out through the **port traits** in [`ports`].

pub mod events;
pub mod ports;
pub mod service;
