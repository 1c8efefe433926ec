//! Speed-button rule table.
//!
//! Each rule is a guard over the current tick's button actions plus an
//! action that mutates the cruise state. Rules are evaluated in table
//! order and only the first matching rule runs: the table order *is*
//! the button priority.
//!
//! ```text
//!  setCruise ^      set / -1
//!  resumeCruise ^   resume / +1
//!  longDown ^ or =  coast
//!  longDown v       end coast
//!  accelCruise ^    next higher speed
//!  decelCruise ^    next lower speed
//! ```

use log::info;

use super::CruiseState;
use super::speed::{SetSpeed, next_speed_down, next_speed_up};
use crate::buttons::{Button, ButtonAction, ButtonActions};
use crate::config::CruiseConfig;

/// Guard over this tick's button actions.
pub type RuleGuardFn = fn(&ButtonActions) -> bool;

/// Mutates the cruise state. Receives the sanitised ego speed (km/h).
pub type RuleActionFn = fn(&mut CruiseState, &CruiseConfig, f32);

/// One row of the rule table.
pub struct SpeedRule {
    pub name: &'static str,
    pub guard: RuleGuardFn,
    pub action: RuleActionFn,
}

/// Priority-ordered speed-button rules.
pub const SPEED_RULES: [SpeedRule; 6] = [
    SpeedRule {
        name: "set",
        guard: set_pressed,
        action: set_or_decrement,
    },
    SpeedRule {
        name: "resume",
        guard: resume_pressed,
        action: resume_or_increment,
    },
    SpeedRule {
        name: "coast",
        guard: long_down_held,
        action: coast,
    },
    SpeedRule {
        name: "coast-end",
        guard: long_down_released,
        action: end_coast,
    },
    SpeedRule {
        name: "step-up",
        guard: accel_pressed,
        action: step_up,
    },
    SpeedRule {
        name: "step-down",
        guard: decel_pressed,
        action: step_down,
    },
];

/// Run the first rule whose guard matches. Returns its name.
pub fn dispatch(
    state: &mut CruiseState,
    config: &CruiseConfig,
    v_ego: f32,
    actions: &ButtonActions,
) -> Option<&'static str> {
    let rule = SPEED_RULES.iter().find(|rule| (rule.guard)(actions))?;
    (rule.action)(state, config, v_ego);
    Some(rule.name)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Guards
// ═══════════════════════════════════════════════════════════════════════════

fn set_pressed(a: &ButtonActions) -> bool {
    a.is(Button::SetCruise, ButtonAction::Rising)
}

fn resume_pressed(a: &ButtonActions) -> bool {
    a.is(Button::ResumeCruise, ButtonAction::Rising)
}

fn long_down_held(a: &ButtonActions) -> bool {
    matches!(
        a.get(Button::LongDown),
        ButtonAction::Rising | ButtonAction::Pressed
    )
}

fn long_down_released(a: &ButtonActions) -> bool {
    a.is(Button::LongDown, ButtonAction::Falling)
}

fn accel_pressed(a: &ButtonActions) -> bool {
    a.is(Button::AccelCruise, ButtonAction::Rising)
}

fn decel_pressed(a: &ButtonActions) -> bool {
    a.is(Button::DecelCruise, ButtonAction::Rising)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Actions
// ═══════════════════════════════════════════════════════════════════════════

fn may_engage(config: &CruiseConfig, v_ego: f32) -> bool {
    v_ego >= config.v_min || config.engage_below_v_min
}

fn engage(state: &mut CruiseState, setpoint: f32) {
    state.setpoint = SetSpeed::Valid(setpoint);
    state.engaged = true;
    state.coasting = false;
    info!("CRUISE: engaged at {:.1} km/h", setpoint);
}

fn set_or_decrement(state: &mut CruiseState, config: &CruiseConfig, v_ego: f32) {
    if state.engaged {
        state.setpoint = state.setpoint.offset(-1.0);
    } else if may_engage(config, v_ego) {
        engage(state, v_ego);
    }
}

fn resume_or_increment(state: &mut CruiseState, config: &CruiseConfig, v_ego: f32) {
    if state.engaged {
        state.setpoint = state.setpoint.offset(1.0);
    } else if may_engage(config, v_ego) {
        // Recall memory when there is one, otherwise behave like set.
        engage(state, state.memory.value().unwrap_or(v_ego));
    }
}

fn coast(state: &mut CruiseState, _config: &CruiseConfig, v_ego: f32) {
    if state.engaged {
        state.setpoint = SetSpeed::Valid(v_ego);
        state.coasting = true;
    }
}

fn end_coast(state: &mut CruiseState, _config: &CruiseConfig, _v_ego: f32) {
    if state.engaged {
        state.coasting = false;
    }
}

/// Speed the step buttons count from: the setpoint while engaged, else
/// the memory, else the current speed.
fn step_base(state: &CruiseState, v_ego: f32) -> f32 {
    let base = if state.engaged {
        state.setpoint
    } else {
        state.memory
    };
    base.value().unwrap_or(v_ego)
}

fn apply_step(state: &mut CruiseState, v: f32) {
    if state.engaged {
        state.setpoint = SetSpeed::Valid(v);
    } else {
        state.memory = SetSpeed::Valid(v);
    }
}

fn step_up(state: &mut CruiseState, config: &CruiseConfig, v_ego: f32) {
    let v = next_speed_up(step_base(state, v_ego), config.v_step, &config.favorites);
    apply_step(state, v);
}

fn step_down(state: &mut CruiseState, config: &CruiseConfig, v_ego: f32) {
    let v = next_speed_down(step_base(state, v_ego), config.v_step, &config.favorites);
    apply_step(state, v);
}
