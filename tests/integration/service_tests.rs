//! Integration tests for the ControlService → cruise + longitudinal pipeline.
//!
//! Drives the service the way a host loop would: stalk inputs and planner
//! outputs in, events and actuator commands out.

use crate::mock_ports::{RecordingSink, planner, stalk};

use pqcruise::app::events::AppEvent;
use pqcruise::app::service::ControlService;
use pqcruise::buttons::Button;
use pqcruise::config::ControllerConfig;
use pqcruise::cruise::speed::SetSpeed;
use pqcruise::cruise::{CruiseInputs, FALLBACK_CLUSTER_SPEED};
use pqcruise::fsm::LongControlState;
use pqcruise::fsm::context::LongitudinalInputs;
use pqcruise::telemetry::{BATCH_LEN, DECIMATION};

fn make_service() -> (ControlService, RecordingSink) {
    let svc = ControlService::new(ControllerConfig::default()).unwrap();
    (svc, RecordingSink::new())
}

fn state_changes(sink: &RecordingSink) -> Vec<(LongControlState, LongControlState)> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::LongStateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

// ── Engagement round trip ─────────────────────────────────────

#[test]
fn set_engages_then_controller_drop_disengages() {
    let (mut svc, mut sink) = make_service();
    let idle = planner(false, 13.9, 13.9);

    // First tick after switch-on is swallowed by the cancel route.
    svc.tick(&stalk(50.0, &[], false), &idle, &mut sink);
    let out = svc.tick(&stalk(50.0, &[Button::SetCruise], false), &idle, &mut sink);
    assert!(out.cruise.engaged);
    assert_eq!(out.cluster_speed, 50.0);
    assert_eq!(sink.engage_speeds(), vec![50.0]);

    let out = svc.tick(&stalk(50.0, &[], true), &planner(true, 13.9, 15.0), &mut sink);
    assert_eq!(out.long_state, LongControlState::Pid);
    assert!(out.actuation.gas > 0.0);
    assert_eq!(out.actuation.brake, 0.0);

    let out = svc.tick(&stalk(50.0, &[], false), &idle, &mut sink);
    assert!(!out.cruise.engaged);
    assert_eq!(out.cruise.display_speed, SetSpeed::Valid(50.0));
    assert_eq!(out.cluster_speed, 50.0);
    assert_eq!(out.long_state, LongControlState::Off);
    assert_eq!(sink.count(|e| *e == AppEvent::DisengageRequested), 1);
    assert_eq!(
        state_changes(&sink),
        vec![
            (LongControlState::Off, LongControlState::Pid),
            (LongControlState::Pid, LongControlState::Off),
        ]
    );
}

#[test]
fn button_presses_and_releases_are_published() {
    let (mut svc, mut sink) = make_service();
    let idle = planner(false, 0.0, 0.0);
    svc.tick(&stalk(50.0, &[Button::GapAdjustCruise], false), &idle, &mut sink);
    svc.tick(&stalk(50.0, &[], false), &idle, &mut sink);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Button(b) if b.pressed)), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Button(b) if !b.pressed)), 1);
}

#[test]
fn main_switch_off_clears_memory_and_disengages() {
    let (mut svc, mut sink) = make_service();
    let idle = planner(false, 0.0, 0.0);
    svc.tick(&stalk(80.0, &[], false), &idle, &mut sink);
    svc.tick(&stalk(80.0, &[Button::SetCruise], false), &idle, &mut sink);

    let out = svc.tick(&CruiseInputs::default(), &idle, &mut sink);
    assert!(!out.cruise.engaged);
    assert_eq!(out.cruise.display_speed, SetSpeed::Unset);
    assert_eq!(out.cluster_speed, FALLBACK_CLUSTER_SPEED);
    assert_eq!(svc.cruise().state().memory(), SetSpeed::Unset);
    assert_eq!(sink.count(|e| *e == AppEvent::DisengageRequested), 1);
}

#[test]
fn fresh_service_reports_fallback_cluster_speed() {
    let (mut svc, mut sink) = make_service();
    let out = svc.tick(
        &stalk(30.0, &[], false),
        &LongitudinalInputs::default(),
        &mut sink,
    );
    assert_eq!(out.cluster_speed, FALLBACK_CLUSTER_SPEED);
}

// ── Longitudinal stop-and-go ──────────────────────────────────

#[test]
fn stop_and_go_emits_every_transition() {
    let (mut svc, mut sink) = make_service();
    let cruise = stalk(0.0, &[], true);

    svc.tick(&cruise, &planner(true, 3.0, 3.0), &mut sink);

    let stopped = LongitudinalInputs {
        standstill: true,
        ..planner(true, 0.0, 0.0)
    };
    for _ in 0..300 {
        let out = svc.tick(&cruise, &stopped, &mut sink);
        assert_eq!(out.actuation.gas, 0.0);
    }
    assert_eq!(svc.longitudinal().state(), LongControlState::Stopping);

    let go = LongitudinalInputs {
        standstill: true,
        ..planner(true, 0.0, 2.0)
    };
    for _ in 0..200 {
        svc.tick(&cruise, &go, &mut sink);
    }

    assert_eq!(
        state_changes(&sink),
        vec![
            (LongControlState::Off, LongControlState::Pid),
            (LongControlState::Pid, LongControlState::Stopping),
            (LongControlState::Stopping, LongControlState::Starting),
            (LongControlState::Starting, LongControlState::Pid),
        ]
    );
}

#[test]
fn stopped_car_holds_brake() {
    let (mut svc, mut sink) = make_service();
    let cruise = stalk(0.0, &[], true);
    svc.tick(&cruise, &planner(true, 1.0, 1.0), &mut sink);

    let stopped = LongitudinalInputs {
        standstill: true,
        cruise_standstill: true,
        ..planner(true, 0.0, 0.0)
    };
    let mut brake = 0.0;
    for _ in 0..500 {
        brake = svc.tick(&cruise, &stopped, &mut sink).actuation.brake;
    }
    assert!(brake >= 0.5, "brake {brake} should hold the car");
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn plot_batches_follow_decimation() {
    let (mut svc, mut sink) = make_service();
    let ticks = 2 * DECIMATION as usize * BATCH_LEN;
    for _ in 0..ticks {
        svc.tick(&stalk(40.0, &[], true), &planner(true, 11.0, 11.0), &mut sink);
    }
    let batches: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Plot(b) => Some(b.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(|b| b.samples().len() == BATCH_LEN));
    assert_eq!(batches[1].samples()[0].state, LongControlState::Pid);

    let bytes = batches[0].encode().unwrap();
    assert_eq!(pqcruise::telemetry::PlotBatch::decode(&bytes).unwrap(), batches[0]);
    assert_eq!(svc.tick_count(), ticks as u64);
}
