//! Set-speed values and next-speed candidate search.

use serde::{Deserialize, Serialize};

/// A cruise speed that may not have been established yet.
///
/// Used for the active setpoint and the resume memory. Arithmetic and
/// clamping only ever touch the `Valid` payload, so an unset value can
/// never leak into a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum SetSpeed {
    #[default]
    Unset,
    Valid(f32),
}

impl SetSpeed {
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn value(self) -> Option<f32> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Unset => None,
        }
    }

    /// `self` if valid, else `other`.
    #[must_use]
    pub fn or(self, other: SetSpeed) -> SetSpeed {
        if self.is_valid() { self } else { other }
    }

    /// Add `delta` to a valid speed; unset stays unset.
    #[must_use]
    pub fn offset(self, delta: f32) -> SetSpeed {
        match self {
            Self::Valid(v) => Self::Valid(v + delta),
            Self::Unset => Self::Unset,
        }
    }

    /// Clamp a valid speed into `[min, max]`; unset stays unset.
    #[must_use]
    pub fn clamped(self, min: f32, max: f32) -> SetSpeed {
        match self {
            Self::Valid(v) => Self::Valid(v.clamp(min, max)),
            Self::Unset => Self::Unset,
        }
    }
}

impl From<Option<f32>> for SetSpeed {
    fn from(v: Option<f32>) -> Self {
        v.map_or(Self::Unset, Self::Valid)
    }
}

/// Next multiple of `step` strictly above `v`.
pub fn next_step_up(v: f32, step: f32) -> f32 {
    if v.rem_euclid(step) == 0.0 {
        v + step
    } else {
        (v / step).ceil() * step
    }
}

/// Next multiple of `step` strictly below `v`.
pub fn next_step_down(v: f32, step: f32) -> f32 {
    if v.rem_euclid(step) == 0.0 {
        v - step
    } else {
        (v / step).floor() * step
    }
}

/// First favourite strictly above `v`, scanning in list order.
pub fn next_favorite_up(v: f32, favorites: &[f32]) -> Option<f32> {
    favorites.iter().copied().find(|&f| f > v)
}

/// First favourite strictly below `v`, scanning from the end of the list.
pub fn next_favorite_down(v: f32, favorites: &[f32]) -> Option<f32> {
    favorites.iter().rev().copied().find(|&f| f < v)
}

/// Next higher speed: the closer of the step candidate and the next
/// favourite.
pub fn next_speed_up(v: f32, step: f32, favorites: &[f32]) -> f32 {
    let by_step = next_step_up(v, step);
    next_favorite_up(v, favorites).map_or(by_step, |fav| by_step.min(fav))
}

/// Next lower speed: the closer of the step candidate and the previous
/// favourite.
pub fn next_speed_down(v: f32, step: f32, favorites: &[f32]) -> f32 {
    let by_step = next_step_down(v, step);
    next_favorite_down(v, favorites).map_or(by_step, |fav| by_step.max(fav))
}
