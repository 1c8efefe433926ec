//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the
//! `log` facade. A bus publisher would implement the same trait.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Button(e) => {
                debug!(
                    "BUTTON | {} {}",
                    e.button.name(),
                    if e.pressed { "pressed" } else { "released" }
                );
            }
            AppEvent::LongStateChanged { from, to } => {
                info!("LONG | {} -> {}", from.name(), to.name());
            }
            AppEvent::EngageRequested { set_speed } => {
                info!("CRUISE | engage at {:.0} km/h", set_speed);
            }
            AppEvent::DisengageRequested => {
                info!("CRUISE | disengage");
            }
            AppEvent::ConfigReloaded => {
                info!("CONFIG | reload staged");
            }
            AppEvent::ConfigRejected(e) => {
                warn!("CONFIG | rejected: {}", e);
            }
            AppEvent::Plot(batch) => {
                if let Some(last) = batch.samples().last() {
                    debug!(
                        "PLOT | n={} | gas={:.2} brake={:.2} | v={:.2} v_pid={:.2} a={:.2} | {}",
                        batch.samples().len(),
                        last.gas,
                        last.brake,
                        last.v_ego,
                        last.v_pid,
                        last.a_target,
                        last.state.name(),
                    );
                }
            }
        }
    }
}
