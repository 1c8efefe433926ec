//! Configuration reload through the JSON adapter and the ConfigPort.

use crate::mock_ports::{RecordingSink, StaticConfig, planner, stalk};

use pqcruise::adapters::json_config::JsonConfigSource;
use pqcruise::app::events::AppEvent;
use pqcruise::app::service::ControlService;
use pqcruise::buttons::Button;
use pqcruise::config::ControllerConfig;
use pqcruise::cruise::speed::SetSpeed;
use pqcruise::error::ConfigError;
use pqcruise::fsm::LongControlState;
use pqcruise::fsm::context::LongitudinalInputs;

fn make_service() -> (ControlService, RecordingSink) {
    let svc = ControlService::new(ControllerConfig::default()).unwrap();
    (svc, RecordingSink::new())
}

#[test]
fn json_reload_changes_step_on_next_tick() {
    let (mut svc, mut sink) = make_service();
    let mut config = ControllerConfig::default();
    config.cruise.v_step = 5.0;
    let source = JsonConfigSource::from_config(&config).unwrap();

    svc.reload(&source, &mut sink).unwrap();
    assert!(svc.has_staged_config());
    assert_eq!(sink.events, vec![AppEvent::ConfigReloaded]);

    let idle = planner(false, 0.0, 0.0);
    svc.tick(&stalk(23.0, &[], false), &idle, &mut sink);
    svc.tick(&stalk(23.0, &[Button::AccelCruise], false), &idle, &mut sink);
    assert_eq!(svc.cruise().state().memory(), SetSpeed::Valid(25.0));
}

#[test]
fn out_of_range_document_is_rejected() {
    let (mut svc, mut sink) = make_service();
    let mut config = ControllerConfig::default();
    config.cruise.v_min = 300.0;
    let source = JsonConfigSource::from_config(&config).unwrap();

    let err = svc.reload(&source, &mut sink).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed(_)));
    assert_eq!(sink.events, vec![AppEvent::ConfigRejected(err)]);
    assert!(!svc.has_staged_config());
    assert_eq!(svc.current_config(), ControllerConfig::default());
}

#[test]
fn empty_and_garbled_documents() {
    let (mut svc, mut sink) = make_service();
    assert_eq!(
        svc.reload(&JsonConfigSource::new(""), &mut sink),
        Err(ConfigError::NotFound)
    );
    assert_eq!(
        svc.reload(&JsonConfigSource::new("{not json"), &mut sink),
        Err(ConfigError::Corrupted)
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ConfigRejected(_))),
        2
    );
}

#[test]
fn longitudinal_retune_waits_for_off() {
    let (mut svc, mut sink) = make_service();
    let cruise = stalk(50.0, &[], true);
    let driving = planner(true, 13.0, 14.0);
    svc.tick(&cruise, &driving, &mut sink);
    assert_eq!(svc.longitudinal().state(), LongControlState::Pid);

    let mut config = ControllerConfig::default();
    config.longitudinal.stopping_brake_rate = 0.4;
    svc.reload(&StaticConfig(Ok(config)), &mut sink).unwrap();

    for _ in 0..10 {
        svc.tick(&cruise, &driving, &mut sink);
    }
    assert!(svc.has_staged_config());
    assert_eq!(svc.current_config().longitudinal.stopping_brake_rate, 0.2);

    svc.tick(&cruise, &planner(false, 13.0, 14.0), &mut sink);
    assert!(!svc.has_staged_config());
    assert_eq!(svc.current_config().longitudinal.stopping_brake_rate, 0.4);
}

#[test]
fn gas_override_also_lands_a_retune() {
    let (mut svc, mut sink) = make_service();
    let cruise = stalk(50.0, &[], true);
    svc.tick(&cruise, &planner(true, 13.0, 14.0), &mut sink);

    let mut config = ControllerConfig::default();
    config.longitudinal.sat_limit = 0.5;
    svc.reload(&StaticConfig(Ok(config)), &mut sink).unwrap();

    let pressed = LongitudinalInputs {
        gas_pressed: true,
        ..planner(true, 13.0, 14.0)
    };
    let out = svc.tick(&cruise, &pressed, &mut sink);
    assert_eq!(out.long_state, LongControlState::Pid);
    assert_eq!(out.actuation.gas, 0.0);
    assert_eq!(svc.current_config().longitudinal.sat_limit, 0.5);
}
