//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them: log, publish on a bus, plot.

use crate::buttons::ButtonEvent;
use crate::error::ConfigError;
use crate::fsm::LongControlState;
use crate::telemetry::PlotBatch;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A stalk button was pressed or released.
    Button(ButtonEvent),

    /// The longitudinal state machine moved.
    LongStateChanged {
        from: LongControlState,
        to: LongControlState,
    },

    /// Cruise logic asks the host to engage at this speed (km/h).
    EngageRequested { set_speed: f32 },

    /// Cruise logic dropped its engagement request.
    DisengageRequested,

    /// A new configuration passed validation and was staged.
    ConfigReloaded,

    /// A configuration load or validation failed; the running one is kept.
    ConfigRejected(ConfigError),

    /// A full batch of decimated plot samples.
    Plot(PlotBatch),
}
