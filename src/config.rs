//! Controller configuration parameters
//!
//! All tunable parameters for the cruise bridge and the longitudinal
//! controller. Values can be swapped at runtime through a
//! [`ConfigPort`](crate::app::ports::ConfigPort) reload.
//!
//! Cruise speeds are in km/h (what the driver sees on the cluster);
//! longitudinal speeds are in m/s.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::control::curve::Curve;
use crate::error::ConfigError;

/// Maximum number of favourite set speeds.
pub const MAX_FAVORITES: usize = 16;

/// What a cancel button press does while engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CancelPolicy {
    /// Cancel presses are not acted upon; the stock main-switch drop is
    /// relied on instead because the cancel signal is unreliable on some
    /// stalks.
    #[default]
    Ignore,
    /// A rising cancel press performs a regular disengage.
    DisengageOnPress,
}

/// Cruise setpoint controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CruiseConfig {
    /// Lowest settable speed (km/h)
    pub v_min: f32,
    /// Highest settable speed (km/h)
    pub v_max: f32,
    /// Coarse step for accel/decel presses (km/h)
    pub v_step: f32,
    /// Optional favourite speeds, ascending (km/h)
    pub favorites: Vec<f32, MAX_FAVORITES>,
    /// Allow set/resume below `v_min`
    pub engage_below_v_min: bool,
    pub cancel_policy: CancelPolicy,
}

impl Default for CruiseConfig {
    fn default() -> Self {
        Self {
            v_min: 7.0,
            v_max: 210.0,
            v_step: 10.0,
            favorites: Vec::new(),
            engage_below_v_min: false,
            cancel_policy: CancelPolicy::Ignore,
        }
    }
}

impl CruiseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.v_min.is_finite() && self.v_max.is_finite() && self.v_step.is_finite()) {
            return Err(ConfigError::ValidationFailed("cruise speeds must be finite"));
        }
        if self.v_min <= 0.0 || self.v_min > self.v_max {
            return Err(ConfigError::ValidationFailed("v_min must be in (0, v_max]"));
        }
        if self.v_step <= 0.0 {
            return Err(ConfigError::ValidationFailed("v_step must be positive"));
        }
        if self.favorites.iter().any(|v| !v.is_finite())
            || self.favorites.windows(2).any(|w| w[1] <= w[0])
        {
            return Err(ConfigError::ValidationFailed(
                "favorites must be finite and strictly ascending",
            ));
        }
        Ok(())
    }
}

/// Longitudinal controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongitudinalConfig {
    /// Proportional gain over speed (m/s)
    pub kp: Curve,
    /// Integral gain over speed (m/s)
    pub ki: Curve,
    /// Maximum gas command over speed (m/s)
    pub gas_max: Curve,
    /// Maximum brake command over speed (m/s)
    pub brake_max: Curve,
    /// Error deadzone over speed (m/s)
    pub deadzone: Curve,
    /// Brake ramp-in while stopping (command units per second)
    pub stopping_brake_rate: f32,
    /// Brake release while starting (command units per second)
    pub starting_brake_rate: f32,
    /// Control loop rate (Hz)
    pub rate_hz: f32,
    /// Lowest speed the bus reports reliably (m/s)
    pub min_speed_can: f32,
    /// Car supports a dedicated stopping controller; disables the
    /// anti-overshoot clamp
    pub stopping_control: bool,
    /// Fraction of a second at a limit before the PI reports saturation
    pub sat_limit: f32,
    /// Scale from summed PI terms (m/s²) to the pedal command
    pub accel_to_pedal: f32,
}

impl Default for LongitudinalConfig {
    fn default() -> Self {
        Self {
            kp: Curve::new(&[0.0, 5.0, 35.0], &[2.0, 1.4, 0.9])
                .unwrap_or_else(|_| Curve::constant(1.0)),
            ki: Curve::new(&[0.0, 35.0], &[0.32, 0.22]).unwrap_or_else(|_| Curve::constant(0.3)),
            gas_max: Curve::constant(1.0),
            brake_max: Curve::new(&[5.0, 20.0], &[1.0, 0.8])
                .unwrap_or_else(|_| Curve::constant(1.0)),
            deadzone: Curve::constant(0.0),
            stopping_brake_rate: 0.2,
            starting_brake_rate: 0.8,
            rate_hz: 100.0,
            min_speed_can: 0.3,
            stopping_control: true,
            sat_limit: 0.8,
            accel_to_pedal: 0.25,
        }
    }
}

impl LongitudinalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.kp.validate()?;
        self.ki.validate()?;
        self.gas_max.validate()?;
        self.brake_max.validate()?;
        self.deadzone.validate()?;
        for curve in [&self.gas_max, &self.brake_max, &self.deadzone] {
            if curve.values().iter().any(|v| *v < 0.0) {
                return Err(ConfigError::ValidationFailed(
                    "gas_max, brake_max and deadzone must be non-negative",
                ));
            }
        }
        if !(self.stopping_brake_rate.is_finite() && self.starting_brake_rate.is_finite()) {
            return Err(ConfigError::ValidationFailed("brake rates must be finite"));
        }
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            return Err(ConfigError::ValidationFailed("rate_hz must be positive"));
        }
        if self.stopping_brake_rate < 0.0 || self.starting_brake_rate < 0.0 {
            return Err(ConfigError::ValidationFailed("brake rates must be non-negative"));
        }
        if !(self.min_speed_can.is_finite() && self.min_speed_can >= 0.0) {
            return Err(ConfigError::ValidationFailed("min_speed_can must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.sat_limit) {
            return Err(ConfigError::ValidationFailed("sat_limit must be within [0, 1]"));
        }
        if !(self.accel_to_pedal.is_finite() && self.accel_to_pedal > 0.0) {
            return Err(ConfigError::ValidationFailed("accel_to_pedal must be positive"));
        }
        Ok(())
    }

    /// Duration of one tick in seconds.
    pub fn tick_period_secs(&self) -> f32 {
        1.0 / self.rate_hz
    }
}

/// Everything a configuration provider hands over in one load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub cruise: CruiseConfig,
    pub longitudinal: LongitudinalConfig,
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cruise.validate()?;
        self.longitudinal.validate()
    }
}
