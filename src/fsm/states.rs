//! Longitudinal state actions, transition function and table builder.
//!
//! ```text
//!            ┌────────[!active, from anywhere]────────┐
//!            ▼                                        │
//!   OFF ──[active]──▶ PID ──[stopping]──▶ STOPPING    │
//!                      ▲                    │    ▲    │
//!                      │             [starting] [stopping]
//!                      │                    ▼    │
//!                      └──[brake released]── STARTING
//! ```
//!
//! Every tick the transition is resolved first, then the action of the
//! resulting state runs. Gas pedal override runs the Off action in any
//! state.

use super::context::LongContext;
use super::{LongControlState, StateDescriptor};
use log::info;

/// Below this speed a low target or brake press means "stop".
pub const STOPPING_EGO_SPEED: f32 = 0.5;
/// Margin above the bus speed floor that still counts as a zero target.
pub const STOPPING_TARGET_SPEED_OFFSET: f32 = 0.01;
/// Future target above which a stopped car should pull away.
pub const STARTING_TARGET_SPEED: f32 = 0.5;
/// Brake level below which Starting hands back to the PI loop.
pub const BRAKE_THRESHOLD_TO_PID: f32 = 0.2;
/// Brake held at least this hard to keep a stopped car stationary.
pub const BRAKE_STOPPING_TARGET: f32 = 0.5;
/// Stock cruise standstill is trusted below this speed.
pub const CRUISE_STANDSTILL_SPEED: f32 = 2.0;
/// Anti-overshoot window: ego speed and future target thresholds.
pub const OVERSHOOT_EGO_SPEED: f32 = 1.5;
pub const OVERSHOOT_TARGET_SPEED: f32 = 0.7;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at construction.
pub fn build_state_table() -> [StateDescriptor; LongControlState::COUNT] {
    [
        StateDescriptor {
            id: LongControlState::Off,
            name: "Off",
            action: off_action,
        },
        StateDescriptor {
            id: LongControlState::Pid,
            name: "Pid",
            action: pid_action,
        },
        StateDescriptor {
            id: LongControlState::Stopping,
            name: "Stopping",
            action: stopping_action,
        },
        StateDescriptor {
            id: LongControlState::Starting,
            name: "Starting",
            action: starting_action,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Transitions
// ═══════════════════════════════════════════════════════════════════════════

pub fn stopping_condition(ctx: &LongContext) -> bool {
    let i = &ctx.inputs;
    let stopping_target = ctx.config.min_speed_can + STOPPING_TARGET_SPEED_OFFSET;
    let target_is_stop = ctx.v_pid < stopping_target && i.v_target_future < stopping_target;

    (i.v_ego < CRUISE_STANDSTILL_SPEED && i.cruise_standstill)
        || (i.v_ego < STOPPING_EGO_SPEED && (target_is_stop || i.brake_pressed))
}

pub fn starting_condition(ctx: &LongContext) -> bool {
    ctx.inputs.v_target_future > STARTING_TARGET_SPEED && !ctx.inputs.cruise_standstill
}

/// Resolve this tick's state from the previous one.
pub fn next_state(ctx: &LongContext, current: LongControlState) -> LongControlState {
    use LongControlState::{Off, Pid, Starting, Stopping};

    if !ctx.inputs.active {
        return Off;
    }

    match current {
        Off => Pid,
        Pid if stopping_condition(ctx) => Stopping,
        Stopping if starting_condition(ctx) => Starting,
        Starting if stopping_condition(ctx) => Stopping,
        Starting if ctx.output >= -BRAKE_THRESHOLD_TO_PID => Pid,
        other => other,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF: also runs on gas override
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn off_action(ctx: &mut LongContext) {
    // Only place a retune may land: the PI loop is about to be reset.
    if ctx.apply_pending_config() {
        info!("LONG: retuned longitudinal parameters");
    }
    let v_pid = ctx.v_ego_pid();
    ctx.reset(v_pid);
    ctx.output = 0.0;
}

// ═══════════════════════════════════════════════════════════════════════════
//  PID: tracking the planner target
// ═══════════════════════════════════════════════════════════════════════════

fn pid_action(ctx: &mut LongContext) {
    let i = ctx.inputs;
    ctx.v_pid = i.v_target;
    ctx.pid.set_limits(-ctx.brake_max, ctx.gas_max);

    // Approaching a stop without a dedicated stopping controller: freeze
    // the integrator and never command gas.
    let prevent_overshoot = !ctx.config.stopping_control
        && i.v_ego < OVERSHOOT_EGO_SPEED
        && i.v_target_future < OVERSHOOT_TARGET_SPEED;

    let v_ego_pid = ctx.v_ego_pid();
    let deadzone = ctx.config.deadzone.eval(v_ego_pid);
    let mut output = ctx.pid.update(
        ctx.v_pid,
        v_ego_pid,
        v_ego_pid,
        i.a_target,
        deadzone,
        prevent_overshoot || i.clutch_pressed,
    );

    if prevent_overshoot {
        output = output.min(0.0);
    }
    ctx.output = output;
}

// ═══════════════════════════════════════════════════════════════════════════
//  STOPPING: ramp the brake in until the car is held
// ═══════════════════════════════════════════════════════════════════════════

fn stopping_action(ctx: &mut LongContext) {
    if !ctx.inputs.standstill || ctx.output > -BRAKE_STOPPING_TARGET {
        ctx.output -= ctx.per_tick(ctx.config.stopping_brake_rate);
    }
    ctx.output = ctx.output.clamp(-ctx.brake_max, ctx.gas_max);
    let v_ego = ctx.inputs.v_ego;
    ctx.reset(v_ego);
}

// ═══════════════════════════════════════════════════════════════════════════
//  STARTING: release the brake before handing back to PID
// ═══════════════════════════════════════════════════════════════════════════

fn starting_action(ctx: &mut LongContext) {
    if ctx.output < -BRAKE_THRESHOLD_TO_PID {
        ctx.output += ctx.per_tick(ctx.config.starting_brake_rate);
    }
    let v_ego = ctx.inputs.v_ego;
    ctx.reset(v_ego);
}
