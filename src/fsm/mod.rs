//! Function-pointer state machine for longitudinal control.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  StateTable                                  │
//! │  ┌──────────┬──────────────┬──────────────┐  │
//! │  │ State    │ name         │ action       │  │
//! │  ├──────────┼──────────────┼──────────────┤  │
//! │  │ Off      │ "Off"        │ fn(ctx)      │  │
//! │  │ Pid      │ "Pid"        │ fn(ctx)      │  │
//! │  │ Stopping │ "Stopping"   │ fn(ctx)      │  │
//! │  │ Starting │ "Starting"   │ fn(ctx)      │  │
//! │  └──────────┴──────────────┴──────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine first resolves the next state from the previous
//! one with [`states::next_state`], then runs the action of the resolved
//! state. A pressed gas pedal overrides the action with the Off action
//! without touching the state itself.

pub mod context;
pub mod states;

use context::{Actuation, LongContext, LongitudinalInputs};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::LongitudinalConfig;
use crate::telemetry::PlotSample;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Longitudinal control states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum LongControlState {
    #[default]
    Off = 0,
    Pid = 1,
    Stopping = 2,
    Starting = 3,
}

impl LongControlState {
    pub const COUNT: usize = 4;

    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Pid => "Pid",
            Self::Stopping => "Stopping",
            Self::Starting => "Starting",
        }
    }
}

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Per-tick action of a state.
pub type StateActionFn = fn(&mut LongContext);

pub struct StateDescriptor {
    pub id: LongControlState,
    pub name: &'static str,
    pub action: StateActionFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    table: [StateDescriptor; LongControlState::COUNT],
    current: usize,
    tick_count: u64,
    state_entry_tick: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; LongControlState::COUNT], initial: LongControlState) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Advance by one tick: resolve the transition, then run the action
    /// of the resolved state (or the Off action while gas is pressed).
    pub fn tick(&mut self, ctx: &mut LongContext) {
        self.tick_count += 1;

        let next = states::next_state(ctx, self.current_state());
        if next as usize != self.current {
            debug!(
                "LONG: {} -> {}",
                self.table[self.current].name, self.table[next as usize].name
            );
            self.current = next as usize;
            self.state_entry_tick = self.tick_count;
        }

        if ctx.inputs.gas_pressed {
            states::off_action(ctx);
        } else {
            (self.table[self.current].action)(ctx);
        }
    }

    pub fn current_state(&self) -> LongControlState {
        self.table[self.current].id
    }

    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }
}

// ---------------------------------------------------------------------------
// Controller facade
// ---------------------------------------------------------------------------

/// Longitudinal controller: the state machine plus its context.
pub struct LongitudinalControl {
    fsm: Fsm,
    ctx: LongContext,
}

impl LongitudinalControl {
    pub fn new(config: LongitudinalConfig) -> Self {
        Self {
            fsm: Fsm::new(states::build_state_table(), LongControlState::Off),
            ctx: LongContext::new(config),
        }
    }

    /// One control step. Never fails; unusable inputs are coerced.
    pub fn update(&mut self, inputs: &LongitudinalInputs) -> Actuation {
        self.ctx.begin_tick(inputs);
        self.fsm.tick(&mut self.ctx);
        self.ctx.actuation()
    }

    pub fn state(&self) -> LongControlState {
        self.fsm.current_state()
    }

    pub fn config(&self) -> &LongitudinalConfig {
        &self.ctx.config
    }

    /// Stage a retune. It lands on the next tick that runs the Off action;
    /// a later call replaces an earlier pending one.
    pub fn stage_config(&mut self, config: LongitudinalConfig) {
        self.ctx.pending_config = Some(config);
    }

    pub fn has_pending_config(&self) -> bool {
        self.ctx.pending_config.is_some()
    }

    /// Speed currently tracked by the PI loop (m/s).
    pub fn pid_setpoint(&self) -> f32 {
        self.ctx.v_pid
    }

    /// Signed command: positive gas, negative brake.
    pub fn output(&self) -> f32 {
        self.ctx.output
    }

    pub fn is_saturated(&self) -> bool {
        self.ctx.pid.is_saturated()
    }

    pub fn ticks_in_current_state(&self) -> u64 {
        self.fsm.ticks_in_current_state()
    }

    /// Snapshot of the last tick for the plot recorder.
    pub fn plot_sample(&self) -> PlotSample {
        let a = self.ctx.actuation();
        PlotSample {
            gas: a.gas,
            brake: a.brake,
            v_ego: self.ctx.v_ego_pid(),
            v_pid: self.ctx.v_pid,
            a_target: self.ctx.inputs.a_target,
            state: self.state(),
        }
    }
}
