//! Fuzz target: JSON configuration reload
//!
//! Feeds arbitrary bytes through `JsonConfigSource` into
//! `ControlService::reload`, then runs a few ticks.
//!
//! Invariants checked:
//! - No panics while parsing or validating arbitrary documents
//! - A rejected document never changes the running configuration
//! - Any accepted document drives the controllers without panicking
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use pqcruise::adapters::json_config::JsonConfigSource;
use pqcruise::app::events::AppEvent;
use pqcruise::app::ports::EventSink;
use pqcruise::app::service::ControlService;
use pqcruise::config::ControllerConfig;
use pqcruise::cruise::CruiseInputs;
use pqcruise::fsm::context::LongitudinalInputs;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(mut svc) = ControlService::new(ControllerConfig::default()) else {
        return;
    };
    let before = svc.current_config();

    let accepted = svc.reload(&JsonConfigSource::new(text), &mut Discard).is_ok();
    if !accepted {
        assert_eq!(svc.current_config(), before);
    }

    let cruise = CruiseInputs {
        v_ego: 50.0,
        main_switch_on: true,
        ..CruiseInputs::default()
    };
    let long = LongitudinalInputs {
        v_ego: 10.0,
        v_target: 12.0,
        v_target_future: 12.0,
        ..LongitudinalInputs::default()
    };
    for active in [false, true, true, false] {
        let out = svc.tick(&cruise, &LongitudinalInputs { active, ..long }, &mut Discard);
        assert!(out.actuation.gas >= 0.0 && out.actuation.brake >= 0.0);
    }
});
