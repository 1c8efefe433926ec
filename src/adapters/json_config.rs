//! JSON configuration source.
//!
//! Implements [`ConfigPort`] over an in-memory JSON document. The host
//! owns the document (file, parameter store, network) and swaps it with
//! [`JsonConfigSource::replace`] before asking the service to reload.

use log::debug;

use crate::app::ports::ConfigPort;
use crate::config::ControllerConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct JsonConfigSource {
    document: String,
}

impl JsonConfigSource {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }

    /// Serialise an existing config, e.g. to seed a parameter store.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, ConfigError> {
        serde_json::to_string(config)
            .map(Self::new)
            .map_err(|_| ConfigError::Corrupted)
    }

    pub fn replace(&mut self, document: impl Into<String>) {
        self.document = document.into();
    }

    pub fn document(&self) -> &str {
        &self.document
    }
}

impl ConfigPort for JsonConfigSource {
    fn load(&self) -> Result<ControllerConfig, ConfigError> {
        if self.document.trim().is_empty() {
            return Err(ConfigError::NotFound);
        }
        serde_json::from_str(&self.document).map_err(|e| {
            debug!("CONFIG: JSON parse failed: {}", e);
            ConfigError::Corrupted
        })
    }
}
