//! Cruise setpoint bridge and longitudinal PI controller.
//!
//! Two per-tick controllers for a car whose stock cruise stalk drives an
//! autonomous longitudinal stack:
//!
//! - [`cruise`] turns stalk button edges into an engaged flag and a set
//!   speed (km/h).
//! - [`fsm`] tracks the planner's target speed with a PI loop and a
//!   four-state stop/start machine, producing gas and brake (m/s input).
//!
//! [`app::service::ControlService`] wires both together behind port traits.
//! No module here performs I/O.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod buttons;
pub mod config;
pub mod control;
pub mod cruise;
pub mod error;
pub mod fsm;
pub mod telemetry;
