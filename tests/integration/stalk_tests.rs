//! Stalk button scenarios through the full service.

use crate::mock_ports::{RecordingSink, StaticConfig, planner, stalk};

use pqcruise::app::service::{ControlService, TickOutput};
use pqcruise::buttons::Button;
use pqcruise::config::{CancelPolicy, ControllerConfig};
use pqcruise::cruise::speed::SetSpeed;

struct Driver {
    svc: ControlService,
    sink: RecordingSink,
}

impl Driver {
    fn new(config: ControllerConfig) -> Self {
        let mut d = Self {
            svc: ControlService::new(config).unwrap(),
            sink: RecordingSink::new(),
        };
        d.hold(0.0, &[]);
        d
    }

    fn hold(&mut self, v_ego: f32, buttons: &[Button]) -> TickOutput {
        self.svc.tick(
            &stalk(v_ego, buttons, false),
            &planner(false, 0.0, 0.0),
            &mut self.sink,
        )
    }

    fn press(&mut self, v_ego: f32, button: Button) -> TickOutput {
        self.hold(v_ego, &[button]);
        self.hold(v_ego, &[])
    }

    fn setpoint(&self) -> SetSpeed {
        self.svc.cruise().state().setpoint()
    }
}

#[test]
fn resume_without_memory_behaves_like_set() {
    let mut d = Driver::new(ControllerConfig::default());
    let out = d.press(42.0, Button::ResumeCruise);
    assert!(out.cruise.engaged);
    assert_eq!(d.setpoint(), SetSpeed::Valid(42.0));
}

#[test]
fn set_below_v_min_is_ignored() {
    let mut d = Driver::new(ControllerConfig::default());
    let out = d.press(5.0, Button::SetCruise);
    assert!(!out.cruise.engaged);
    assert_eq!(d.sink.engage_speeds(), Vec::<f32>::new());
}

#[test]
fn decel_while_disengaged_counts_down_from_speed() {
    let mut d = Driver::new(ControllerConfig::default());
    let out = d.press(47.0, Button::DecelCruise);
    assert!(!out.cruise.engaged);
    assert_eq!(out.cruise.display_speed, SetSpeed::Valid(40.0));
    assert_eq!(out.cluster_speed, 40.0);

    // Resume now picks up the adjusted memory.
    d.press(47.0, Button::ResumeCruise);
    assert_eq!(d.setpoint(), SetSpeed::Valid(40.0));
}

#[test]
fn gap_button_leaves_setpoint_alone() {
    let mut d = Driver::new(ControllerConfig::default());
    d.press(60.0, Button::SetCruise);
    d.press(60.0, Button::GapAdjustCruise);
    assert_eq!(d.setpoint(), SetSpeed::Valid(60.0));
}

#[test]
fn set_wins_over_accel_in_the_same_tick() {
    let mut d = Driver::new(ControllerConfig::default());
    d.hold(64.0, &[Button::AccelCruise, Button::SetCruise]);
    assert_eq!(d.setpoint(), SetSpeed::Valid(64.0));
}

#[test]
fn cancel_is_ignored_by_default() {
    let mut d = Driver::new(ControllerConfig::default());
    d.press(70.0, Button::SetCruise);
    let out = d.press(70.0, Button::Cancel);
    assert!(out.cruise.engaged);
}

#[test]
fn cancel_disengages_when_configured() {
    let mut config = ControllerConfig::default();
    config.cruise.cancel_policy = CancelPolicy::DisengageOnPress;
    let mut d = Driver::new(config);
    d.press(70.0, Button::SetCruise);

    let out = d.hold(70.0, &[Button::Cancel]);
    assert!(!out.cruise.engaged);
    assert_eq!(out.cruise.display_speed, SetSpeed::Valid(70.0));

    // Cancel changes again on release, so that tick is swallowed too.
    let out = d.hold(70.0, &[Button::ResumeCruise]);
    assert!(!out.cruise.engaged);
    d.hold(70.0, &[]);
    let out = d.press(70.0, Button::ResumeCruise);
    assert!(out.cruise.engaged);
    assert_eq!(d.setpoint(), SetSpeed::Valid(70.0));
}

#[test]
fn favorites_from_reload_shape_the_steps() {
    let mut d = Driver::new(ControllerConfig::default());
    let mut config = ControllerConfig::default();
    config.cruise.favorites = heapless::Vec::from_slice(&[50.0, 80.0, 100.0]).unwrap();
    d.svc.reload(&StaticConfig(Ok(config)), &mut d.sink).unwrap();

    d.press(45.0, Button::SetCruise);
    d.press(45.0, Button::AccelCruise);
    assert_eq!(d.setpoint(), SetSpeed::Valid(50.0));
    d.press(45.0, Button::AccelCruise);
    assert_eq!(d.setpoint(), SetSpeed::Valid(60.0));
    d.press(45.0, Button::DecelCruise);
    assert_eq!(d.setpoint(), SetSpeed::Valid(50.0));
}
