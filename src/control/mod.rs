//! Control primitives shared by the longitudinal state machine.

pub mod curve;
pub mod pid;
