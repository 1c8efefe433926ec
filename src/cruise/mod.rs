//! Cruise setpoint controller.
//!
//! Turns stock cruise-stalk button presses into an engaged flag and a set
//! speed for the longitudinal planner, the way the stock ACC would.
//!
//! ```text
//!                main switch off (any state)
//!        ┌────────────────────────────────────────────┐
//!        ▼                                            │
//!   DISENGAGED ──[set ^ / resume ^, v >= v_min]──▶ ENGAGED ◀──┐
//!   (holds memory)                                 │  │       │ [longDown v]
//!        ▲                                         │  └─▶ COASTING
//!        └────[controller drops engagement]────────┘  [longDown ^/=]
//! ```
//!
//! Each tick is routed to exactly one handler, first match wins:
//!
//! 1. controller disengage edge → regular disengage
//! 2. cancel action changed      → cancel handler ([`CancelPolicy`])
//! 3. gap action changed         → distance handler (reserved, no-op)
//! 4. otherwise                  → speed-button rule table ([`handlers`])

pub mod handlers;
pub mod speed;

use log::{debug, info};

use crate::buttons::{Button, ButtonAction, ButtonActions, ButtonSnapshot, classify};
use crate::config::{CancelPolicy, CruiseConfig};
use speed::SetSpeed;

/// Cluster speed reported when neither a setpoint nor a memory exists.
pub const FALLBACK_CLUSTER_SPEED: f32 = 88.0;

// ---------------------------------------------------------------------------
// Inputs / outputs
// ---------------------------------------------------------------------------

/// Signals sampled once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct CruiseInputs {
    /// Vehicle speed (km/h). NaN or negative reads as 0.
    pub v_ego: f32,
    /// Raw stalk button states.
    pub buttons: ButtonSnapshot,
    /// Stock cruise main switch.
    pub main_switch_on: bool,
    /// Whether the autonomous controller is engaged this tick.
    pub controller_engaged: bool,
}

/// What the vehicle layer needs back each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CruiseOutput {
    /// Request longitudinal engagement.
    pub engaged: bool,
    /// Setpoint if engaged, otherwise the resume memory.
    pub display_speed: SetSpeed,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything the controller remembers between ticks.
///
/// `setpoint` is valid exactly when `engaged` is set. Valid speeds are
/// kept within `[v_min, v_max]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CruiseState {
    pub(crate) setpoint: SetSpeed,
    pub(crate) memory: SetSpeed,
    pub(crate) engaged: bool,
    pub(crate) coasting: bool,
    pub(crate) display_speed: SetSpeed,
    pub(crate) prev_buttons: ButtonSnapshot,
    pub(crate) prev_actions: ButtonActions,
    pub(crate) prev_controller_engaged: bool,
}

impl CruiseState {
    pub fn setpoint(&self) -> SetSpeed {
        self.setpoint
    }

    pub fn memory(&self) -> SetSpeed {
        self.memory
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn is_coasting(&self) -> bool {
        self.coasting
    }

    pub fn display_speed(&self) -> SetSpeed {
        self.display_speed
    }

    /// Save the setpoint for resume and drop engagement.
    fn disengage(&mut self) {
        self.memory = self.setpoint;
        self.setpoint = SetSpeed::Unset;
        if self.engaged {
            info!("CRUISE: disengaged, memory {:?}", self.memory);
        }
        self.engaged = false;
        self.coasting = false;
    }
}

/// Which handler a tick is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Disengage,
    Cancel,
    Distance,
    Speed,
}

/// Pick the handler for this tick.
pub fn route(
    disengage_trigger: bool,
    previous: &ButtonActions,
    current: &ButtonActions,
) -> Route {
    if disengage_trigger {
        Route::Disengage
    } else if previous.get(Button::Cancel) != current.get(Button::Cancel) {
        // A press right after cancel lands here and is swallowed.
        Route::Cancel
    } else if previous.get(Button::GapAdjustCruise) != current.get(Button::GapAdjustCruise) {
        Route::Distance
    } else {
        Route::Speed
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct CruiseSetpointController {
    config: CruiseConfig,
    state: CruiseState,
}

impl CruiseSetpointController {
    pub fn new(config: CruiseConfig) -> Self {
        Self {
            config,
            state: CruiseState::default(),
        }
    }

    pub fn config(&self) -> &CruiseConfig {
        &self.config
    }

    /// Replace the configuration. Call between ticks only. Held speeds
    /// are pulled into the new range immediately.
    pub fn set_config(&mut self, config: CruiseConfig) {
        self.config = config;
        self.clamp_speeds();
    }

    pub fn state(&self) -> &CruiseState {
        &self.state
    }

    /// Process one tick of stalk input.
    pub fn tick(&mut self, inputs: &CruiseInputs) -> CruiseOutput {
        if !inputs.main_switch_on {
            if self.state != CruiseState::default() {
                info!("CRUISE: main switch off, state reset");
            }
            self.state = CruiseState::default();
            return self.output();
        }

        let v_ego = sanitize_speed(inputs.v_ego);
        let actions = classify(&self.state.prev_buttons, &inputs.buttons);
        let disengage_trigger = self.state.prev_controller_engaged && !inputs.controller_engaged;

        self.dispatch(v_ego, &actions, disengage_trigger);

        self.state.prev_buttons = inputs.buttons;
        self.state.prev_actions = actions;
        self.state.prev_controller_engaged = inputs.controller_engaged;
        self.output()
    }

    /// Apply already-classified button actions.
    ///
    /// [`tick`](Self::tick) wraps this with edge detection and bookkeeping;
    /// it is public for callers that classify buttons themselves.
    pub fn dispatch(&mut self, v_ego: f32, actions: &ButtonActions, disengage_trigger: bool) {
        let v_ego = sanitize_speed(v_ego);
        let route = route(disengage_trigger, &self.state.prev_actions, actions);
        debug!("CRUISE: {:?} [{}]", route, actions.trace());

        match route {
            Route::Disengage => self.state.disengage(),
            Route::Cancel => self.handle_cancel(actions),
            Route::Distance => self.handle_distance(actions),
            Route::Speed => {
                if let Some(rule) =
                    handlers::dispatch(&mut self.state, &self.config, v_ego, actions)
                {
                    debug!("CRUISE: rule {rule}");
                }
            }
        }

        self.clamp_speeds();
        self.state.display_speed = self.state.setpoint.or(self.state.memory);
    }

    fn handle_cancel(&mut self, actions: &ButtonActions) {
        match self.config.cancel_policy {
            CancelPolicy::Ignore => {}
            CancelPolicy::DisengageOnPress => {
                if self.state.engaged && actions.is(Button::Cancel, ButtonAction::Rising) {
                    self.state.disengage();
                }
            }
        }
    }

    /// Reserved for follow-distance adjustment; the gap button has no
    /// effect on the set speed.
    fn handle_distance(&mut self, _actions: &ButtonActions) {}

    fn clamp_speeds(&mut self) {
        let (lo, hi) = (self.config.v_min, self.config.v_max);
        self.state.setpoint = self.state.setpoint.clamped(lo, hi);
        self.state.memory = self.state.memory.clamped(lo, hi);
    }

    pub fn output(&self) -> CruiseOutput {
        CruiseOutput {
            engaged: self.state.engaged,
            display_speed: self.state.display_speed,
        }
    }

    /// Always-valid speed for the cluster: setpoint, else displayed
    /// memory, else [`FALLBACK_CLUSTER_SPEED`].
    pub fn cluster_speed(&self) -> f32 {
        self.state
            .setpoint
            .or(self.state.display_speed)
            .value()
            .unwrap_or(FALLBACK_CLUSTER_SPEED)
    }
}

/// NaN and negative speeds read as standstill.
pub fn sanitize_speed(v: f32) -> f32 {
    if v.is_nan() || v < 0.0 { 0.0 } else { v }
}
