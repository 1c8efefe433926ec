//! Port traits: the boundary between the controllers and whatever hosts them.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Configuration providers and event consumers implement these traits.
//! [`ControlService`](super::service::ControlService) takes them as
//! generics at the call site, so the domain never does I/O itself.

use crate::config::ControllerConfig;
use crate::error::ConfigError;

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / bus publisher)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (provider → domain)
// ───────────────────────────────────────────────────────────────

/// Supplies controller configuration.
///
/// Implementations only parse; range checks happen in the service via
/// [`ControllerConfig::validate`] before anything is staged.
pub trait ConfigPort {
    /// Fetch the current configuration document.
    fn load(&self) -> Result<ControllerConfig, ConfigError>;
}
