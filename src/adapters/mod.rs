//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter       | Implements | Connects to              |
//! |---------------|------------|--------------------------|
//! | `json_config` | ConfigPort | In-memory JSON document  |
//! | `log_sink`    | EventSink  | `log` facade             |

pub mod json_config;
pub mod log_sink;
