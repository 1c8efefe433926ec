//! Mock port adapters for integration tests.
//!
//! Records every emitted event so tests can assert on the full history,
//! and serves a fixed configuration result.

use pqcruise::app::events::AppEvent;
use pqcruise::app::ports::{ConfigPort, EventSink};
use pqcruise::buttons::{Button, ButtonSnapshot};
use pqcruise::config::ControllerConfig;
use pqcruise::cruise::CruiseInputs;
use pqcruise::error::ConfigError;
use pqcruise::fsm::context::LongitudinalInputs;

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn engage_speeds(&self) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::EngageRequested { set_speed } => Some(*set_speed),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── StaticConfig ──────────────────────────────────────────────

pub struct StaticConfig(pub Result<ControllerConfig, ConfigError>);

impl ConfigPort for StaticConfig {
    fn load(&self) -> Result<ControllerConfig, ConfigError> {
        self.0.clone()
    }
}

// ── Input builders ────────────────────────────────────────────

#[allow(dead_code)]
pub fn stalk(v_ego: f32, pressed: &[Button], controller_engaged: bool) -> CruiseInputs {
    let mut buttons = ButtonSnapshot::released();
    for b in pressed {
        buttons.set(*b, true);
    }
    CruiseInputs {
        v_ego,
        buttons,
        main_switch_on: true,
        controller_engaged,
    }
}

#[allow(dead_code)]
pub fn planner(active: bool, v_ego: f32, v_target: f32) -> LongitudinalInputs {
    LongitudinalInputs {
        active,
        v_ego,
        v_target,
        v_target_future: v_target,
        ..LongitudinalInputs::default()
    }
}
