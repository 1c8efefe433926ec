//! Speed-scheduled PI controller for longitudinal actuation.
//!
//! Proportional-integral controller with gains looked up from speed
//! curves, an additive feed-forward term, a centred error deadzone,
//! an optional integrator freeze and conditional integration against
//! the output limits (anti-windup). Output is a signed gas/brake
//! command: positive is gas, negative is brake.

use super::curve::Curve;

/// Shrink `error` towards zero by `deadzone`; errors inside the band are zero.
pub fn apply_deadzone(error: f32, deadzone: f32) -> f32 {
    if error > deadzone {
        error - deadzone
    } else if error < -deadzone {
        error + deadzone
    } else {
        0.0
    }
}

/// PI controller
pub struct PiController {
    kp: Curve,
    ki: Curve,
    kf: f32,
    /// Scale from the summed terms to the actuator command.
    convert: f32,
    pos_limit: f32,
    neg_limit: f32,
    /// Integrator gain per tick (1 / rate).
    i_rate: f32,
    sat_count_rate: f32,
    sat_limit: f32,

    p: f32,
    i: f32,
    f: f32,
    control: f32,
    sat_count: f32,
    saturated: bool,
}

impl PiController {
    pub fn new(kp: Curve, ki: Curve, rate_hz: f32, sat_limit: f32) -> Self {
        Self {
            kp,
            ki,
            kf: 1.0,
            convert: 1.0,
            pos_limit: 1.0,
            neg_limit: -1.0,
            i_rate: 1.0 / rate_hz,
            sat_count_rate: 1.0 / rate_hz,
            sat_limit,
            p: 0.0,
            i: 0.0,
            f: 0.0,
            control: 0.0,
            sat_count: 0.0,
            saturated: false,
        }
    }

    /// Set output limits
    pub fn set_limits(&mut self, neg_limit: f32, pos_limit: f32) {
        self.neg_limit = neg_limit;
        self.pos_limit = pos_limit;
    }

    /// Scale applied to P + I + F before limiting and saturation checks.
    pub fn set_conversion(&mut self, gain: f32) {
        self.convert = gain;
    }

    /// Swap gain schedules (live retune). Accumulated state is kept.
    pub fn set_gains(&mut self, kp: Curve, ki: Curve, rate_hz: f32, sat_limit: f32) {
        self.kp = kp;
        self.ki = ki;
        self.i_rate = 1.0 / rate_hz;
        self.sat_count_rate = 1.0 / rate_hz;
        self.sat_limit = sat_limit;
    }

    /// Run one controller step and return the clipped output.
    ///
    /// Gains are evaluated at `speed`. With `freeze_integrator` set the
    /// accumulator is left untouched but P and FF still act.
    pub fn update(
        &mut self,
        setpoint: f32,
        measurement: f32,
        speed: f32,
        feedforward: f32,
        deadzone: f32,
        freeze_integrator: bool,
    ) -> f32 {
        let error = apply_deadzone(setpoint - measurement, deadzone);
        self.p = error * self.kp.eval(speed);
        self.f = feedforward * self.kf;

        let i = self.i + error * self.ki.eval(speed) * self.i_rate;
        let candidate = (self.p + self.f + i) * self.convert;

        // Only integrate when it moves the output away from a saturated
        // limit or the accumulator towards the sign of the error.
        let may_integrate = (error >= 0.0 && (candidate <= self.pos_limit || i < 0.0))
            || (error <= 0.0 && (candidate >= self.neg_limit || i > 0.0));
        if may_integrate && !freeze_integrator {
            self.i = i;
        }

        let control = (self.p + self.i + self.f) * self.convert;
        self.saturated = self.check_saturation(control, error);
        self.control = control.clamp(self.neg_limit, self.pos_limit);
        self.control
    }

    /// Reset controller state
    pub fn reset(&mut self) {
        self.p = 0.0;
        self.i = 0.0;
        self.f = 0.0;
        self.control = 0.0;
        self.sat_count = 0.0;
        self.saturated = false;
    }

    /// True once the output has been pinned at a limit for longer than the
    /// configured fraction of a second.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    pub fn integral(&self) -> f32 {
        self.i
    }

    pub fn proportional(&self) -> f32 {
        self.p
    }

    pub fn feedforward(&self) -> f32 {
        self.f
    }

    pub fn output(&self) -> f32 {
        self.control
    }

    fn check_saturation(&mut self, control: f32, error: f32) -> bool {
        let outside = control < self.neg_limit || control > self.pos_limit;
        if outside && error.abs() > 0.1 {
            self.sat_count += self.sat_count_rate;
        } else {
            self.sat_count -= self.sat_count_rate;
        }
        self.sat_count = self.sat_count.clamp(0.0, 1.0);
        self.sat_count > self.sat_limit
    }
}
