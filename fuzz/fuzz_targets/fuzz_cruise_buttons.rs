//! Fuzz target: cruise setpoint controller
//!
//! Each 3-byte chunk is one tick: a button bitmask, a speed byte and a
//! flags byte (main switch, controller engaged, NaN speed).
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Engaged implies a valid setpoint inside `[v_min, v_max]`
//! - Memory, when valid, stays inside `[v_min, v_max]`
//! - Main switch off always leaves the controller disengaged
//!
//! cargo fuzz run fuzz_cruise_buttons

#![no_main]

use libfuzzer_sys::fuzz_target;
use pqcruise::buttons::{Button, ButtonSnapshot};
use pqcruise::config::CruiseConfig;
use pqcruise::cruise::{CruiseInputs, CruiseSetpointController};

fuzz_target!(|data: &[u8]| {
    let config = CruiseConfig::default();
    let mut ctl = CruiseSetpointController::new(config.clone());

    for chunk in data.chunks_exact(3) {
        let mut buttons = ButtonSnapshot::released();
        for b in Button::ALL {
            buttons.set(b, chunk[0] & (1 << b as u8) != 0);
        }
        let flags = chunk[2];
        let inputs = CruiseInputs {
            v_ego: if flags & 0b100 != 0 { f32::NAN } else { f32::from(chunk[1]) },
            buttons,
            main_switch_on: flags & 0b001 != 0,
            controller_engaged: flags & 0b010 != 0,
        };

        let out = ctl.tick(&inputs);
        let state = ctl.state();

        if !inputs.main_switch_on {
            assert!(!out.engaged);
        }
        if state.is_engaged() {
            let v = state.setpoint().value().expect("engaged without setpoint");
            assert!(v >= config.v_min && v <= config.v_max);
        }
        if let Some(m) = state.memory().value() {
            assert!(m >= config.v_min && m <= config.v_max);
        }
        assert!(ctl.cluster_speed().is_finite());
    }
});
