//! Shared mutable context threaded through every longitudinal state action.
//!
//! `LongContext` holds the current tick's inputs, the speed-scheduled
//! actuation limits derived from them, the PI controller, and the two
//! values that survive between ticks: the PID setpoint (`v_pid`) and the
//! signed gas/brake command (`output`).

use crate::config::LongitudinalConfig;
use crate::control::pid::PiController;
use crate::cruise::sanitize_speed;

// ---------------------------------------------------------------------------
// Inputs (written once per tick by the vehicle layer)
// ---------------------------------------------------------------------------

/// Everything the longitudinal controller samples each tick. Speeds in
/// m/s, acceleration in m/s².
#[derive(Debug, Clone, Copy, Default)]
pub struct LongitudinalInputs {
    /// Longitudinal control requested by the engagement logic.
    pub active: bool,
    /// Measured vehicle speed.
    pub v_ego: f32,
    /// Planner target speed for this tick.
    pub v_target: f32,
    /// Planner target speed a short horizon ahead.
    pub v_target_future: f32,
    /// Planner target acceleration, used as feed-forward.
    pub a_target: f32,
    pub gas_pressed: bool,
    pub brake_pressed: bool,
    pub clutch_pressed: bool,
    /// Vehicle is stationary.
    pub standstill: bool,
    /// Stock cruise reports it is holding the car at standstill.
    pub cruise_standstill: bool,
}

impl LongitudinalInputs {
    /// Coerce unusable signals: NaN/negative ego speed reads as 0 and
    /// non-finite planner values read as 0 (a stop request).
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.v_ego = sanitize_speed(self.v_ego);
        for v in [
            &mut self.v_target,
            &mut self.v_target_future,
            &mut self.a_target,
        ] {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Final actuator commands. Both are non-negative and at most one is
/// non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Actuation {
    pub gas: f32,
    pub brake: f32,
}

// ---------------------------------------------------------------------------
// LongContext
// ---------------------------------------------------------------------------

pub struct LongContext {
    // -- Inputs --
    pub inputs: LongitudinalInputs,
    /// Gas limit at the current speed.
    pub gas_max: f32,
    /// Brake limit at the current speed.
    pub brake_max: f32,

    // -- Controller --
    pub config: LongitudinalConfig,
    /// Retune waiting for the next Off tick.
    pub pending_config: Option<LongitudinalConfig>,
    pub pid: PiController,
    /// Target speed currently tracked by the PI loop.
    pub v_pid: f32,
    /// Signed command: positive gas, negative brake. Persists across ticks.
    pub output: f32,
}

impl LongContext {
    pub fn new(config: LongitudinalConfig) -> Self {
        let mut pid = PiController::new(
            config.kp.clone(),
            config.ki.clone(),
            config.rate_hz,
            config.sat_limit,
        );
        pid.set_conversion(config.accel_to_pedal);
        Self {
            inputs: LongitudinalInputs::default(),
            gas_max: 0.0,
            brake_max: 0.0,
            config,
            pending_config: None,
            pid,
            v_pid: 0.0,
            output: 0.0,
        }
    }

    /// Latch this tick's inputs and look up the actuation limits.
    pub fn begin_tick(&mut self, inputs: &LongitudinalInputs) {
        self.inputs = inputs.sanitized();
        self.gas_max = self.config.gas_max.eval(self.inputs.v_ego);
        self.brake_max = self.config.brake_max.eval(self.inputs.v_ego);
    }

    /// Ego speed as fed to the PI loop: the bus reads 0 below its
    /// resolution, so the floor avoids jumps at crawl speed.
    pub fn v_ego_pid(&self) -> f32 {
        self.inputs.v_ego.max(self.config.min_speed_can)
    }

    /// Output change per tick for a rate given in units per second.
    pub fn per_tick(&self, rate: f32) -> f32 {
        rate / self.config.rate_hz
    }

    /// Reset the PI loop and re-seed its setpoint.
    pub fn reset(&mut self, v_pid: f32) {
        self.pid.reset();
        self.v_pid = v_pid;
    }

    /// Swap in a staged retune, if any.
    pub fn apply_pending_config(&mut self) -> bool {
        let Some(config) = self.pending_config.take() else {
            return false;
        };
        self.pid.set_gains(
            config.kp.clone(),
            config.ki.clone(),
            config.rate_hz,
            config.sat_limit,
        );
        self.pid.set_conversion(config.accel_to_pedal);
        self.config = config;
        true
    }

    /// Split the signed command into gas and brake. The idle side is
    /// always `+0.0`.
    pub fn actuation(&self) -> Actuation {
        let gas = if self.output > 0.0 {
            self.output.min(self.gas_max)
        } else {
            0.0
        };
        let brake = if self.output < 0.0 {
            (-self.output).min(self.brake_max)
        } else {
            0.0
        };
        Actuation { gas, brake }
    }
}
