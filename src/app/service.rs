//! Application service: the hexagonal core.
//!
//! [`ControlService`] owns the cruise setpoint controller, the longitudinal
//! controller and the plot recorder. Hosts call [`ControlService::tick`]
//! once per control period; configuration and events flow through port
//! traits passed in at the call site.
//!
//! ```text
//!   ConfigPort ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!                  │        ControlService         │
//!   inputs     ──▶ │  Cruise · Longitudinal · Plot │ ──▶ TickOutput
//!                  └───────────────────────────────┘
//! ```

use log::{info, warn};

use crate::buttons::{ButtonSnapshot, button_events};
use crate::config::{ControllerConfig, CruiseConfig};
use crate::cruise::{CruiseInputs, CruiseOutput, CruiseSetpointController};
use crate::error::ConfigError;
use crate::fsm::context::{Actuation, LongitudinalInputs};
use crate::fsm::{LongControlState, LongitudinalControl};
use crate::telemetry::PlotRecorder;

use super::events::AppEvent;
use super::ports::{ConfigPort, EventSink};

/// Everything the host writes back after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    pub cruise: CruiseOutput,
    /// Always-valid speed for the instrument cluster (km/h).
    pub cluster_speed: f32,
    pub actuation: Actuation,
    pub long_state: LongControlState,
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService {
    cruise: CruiseSetpointController,
    long: LongitudinalControl,
    recorder: PlotRecorder,
    /// Cruise config waiting for the start of the next tick.
    staged_cruise: Option<CruiseConfig>,
    prev_buttons: ButtonSnapshot,
    prev_engaged: bool,
    tick_count: u64,
}

impl ControlService {
    /// Build the service. The configuration is validated first; nothing
    /// is constructed from a config that would be rejected by a reload.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cruise: CruiseSetpointController::new(config.cruise),
            long: LongitudinalControl::new(config.longitudinal),
            recorder: PlotRecorder::new(),
            staged_cruise: None,
            prev_buttons: ButtonSnapshot::released(),
            prev_engaged: false,
            tick_count: 0,
        })
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: staged config → buttons → cruise →
    /// longitudinal → telemetry.
    pub fn tick(
        &mut self,
        cruise_inputs: &CruiseInputs,
        long_inputs: &LongitudinalInputs,
        sink: &mut impl EventSink,
    ) -> TickOutput {
        self.tick_count += 1;

        // 1. Staged cruise config lands before any button is looked at
        if let Some(config) = self.staged_cruise.take() {
            self.cruise.set_config(config);
            info!("CRUISE: configuration applied");
        }

        // 2. Raw button changes
        for event in button_events(&self.prev_buttons, &cruise_inputs.buttons) {
            sink.emit(&AppEvent::Button(event));
        }
        self.prev_buttons = cruise_inputs.buttons;

        // 3. Cruise setpoint logic and engagement edges
        let cruise = self.cruise.tick(cruise_inputs);
        let cluster_speed = self.cruise.cluster_speed();
        match (self.prev_engaged, cruise.engaged) {
            (false, true) => sink.emit(&AppEvent::EngageRequested {
                set_speed: cluster_speed,
            }),
            (true, false) => sink.emit(&AppEvent::DisengageRequested),
            _ => {}
        }
        self.prev_engaged = cruise.engaged;

        // 4. Longitudinal control
        let prev_state = self.long.state();
        let actuation = self.long.update(long_inputs);
        let long_state = self.long.state();
        if long_state != prev_state {
            sink.emit(&AppEvent::LongStateChanged {
                from: prev_state,
                to: long_state,
            });
        }

        // 5. Plot telemetry
        if let Some(batch) = self.recorder.record(self.long.plot_sample()) {
            sink.emit(&AppEvent::Plot(batch));
        }

        TickOutput {
            cruise,
            cluster_speed,
            actuation,
            long_state,
        }
    }

    // ── Configuration ─────────────────────────────────────────

    /// Load, validate and stage a new configuration.
    ///
    /// The cruise half applies at the start of the next tick. The
    /// longitudinal half applies on the next tick that runs the Off
    /// action. On failure the running configuration is untouched.
    pub fn reload(
        &mut self,
        port: &impl ConfigPort,
        sink: &mut impl EventSink,
    ) -> Result<(), ConfigError> {
        match port.load().and_then(|c| c.validate().map(|()| c)) {
            Ok(config) => {
                self.staged_cruise = Some(config.cruise);
                self.long.stage_config(config.longitudinal);
                info!("CONFIG: reload staged");
                sink.emit(&AppEvent::ConfigReloaded);
                Ok(())
            }
            Err(e) => {
                warn!("CONFIG: reload rejected: {}", e);
                sink.emit(&AppEvent::ConfigRejected(e));
                Err(e)
            }
        }
    }

    /// Whether part of a reload is still waiting to be applied.
    pub fn has_staged_config(&self) -> bool {
        self.staged_cruise.is_some() || self.long.has_pending_config()
    }

    /// Configuration currently in effect (staged changes excluded).
    pub fn current_config(&self) -> ControllerConfig {
        ControllerConfig {
            cruise: self.cruise.config().clone(),
            longitudinal: self.long.config().clone(),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn cruise(&self) -> &CruiseSetpointController {
        &self.cruise
    }

    pub fn longitudinal(&self) -> &LongitudinalControl {
        &self.long
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
