//! Piecewise-linear lookup curves for speed-scheduled parameters.
//!
//! Gains, actuation limits and the deadzone are all tuned as a function of
//! vehicle speed. A [`Curve`] holds up to [`CURVE_POINTS`] breakpoint/value
//! pairs in fixed-capacity storage and interpolates linearly between them,
//! holding the first/last value outside the breakpoint range.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum number of breakpoints a curve can carry.
pub const CURVE_POINTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    breakpoints: Vec<f32, CURVE_POINTS>,
    values: Vec<f32, CURVE_POINTS>,
}

impl Curve {
    /// Build a validated curve from parallel breakpoint/value slices.
    pub fn new(breakpoints: &[f32], values: &[f32]) -> Result<Self, ConfigError> {
        let curve = Self {
            breakpoints: Vec::from_slice(breakpoints)
                .map_err(|_| ConfigError::ValidationFailed("curve has too many breakpoints"))?,
            values: Vec::from_slice(values)
                .map_err(|_| ConfigError::ValidationFailed("curve has too many values"))?,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// A curve that evaluates to `value` at every speed.
    pub fn constant(value: f32) -> Self {
        Self {
            breakpoints: Vec::from_slice(&[0.0]).unwrap_or_default(),
            values: Vec::from_slice(&[value]).unwrap_or_default(),
        }
    }

    pub fn breakpoints(&self) -> &[f32] {
        &self.breakpoints
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Check shape invariants: non-empty, equal lengths, finite values and
    /// strictly ascending breakpoints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.breakpoints.is_empty() {
            return Err(ConfigError::ValidationFailed("curve is empty"));
        }
        if self.breakpoints.len() != self.values.len() {
            return Err(ConfigError::ValidationFailed(
                "curve breakpoints and values differ in length",
            ));
        }
        if self
            .breakpoints
            .iter()
            .chain(self.values.iter())
            .any(|x| !x.is_finite())
        {
            return Err(ConfigError::ValidationFailed("curve contains non-finite entries"));
        }
        if self.breakpoints.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ConfigError::ValidationFailed(
                "curve breakpoints must be strictly ascending",
            ));
        }
        Ok(())
    }

    /// Interpolate the curve at `x`, clamping to the end values.
    pub fn eval(&self, x: f32) -> f32 {
        let (Some(&first_bp), Some(&first_v)) = (self.breakpoints.first(), self.values.first())
        else {
            return 0.0;
        };
        if x <= first_bp {
            return first_v;
        }

        for i in 1..self.breakpoints.len().min(self.values.len()) {
            let (x0, x1) = (self.breakpoints[i - 1], self.breakpoints[i]);
            if x < x1 {
                let (y0, y1) = (self.values[i - 1], self.values[i]);
                return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
            }
        }

        self.values.last().copied().unwrap_or(first_v)
    }
}
