use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The configuration values of the proof server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// The address the HTTP server binds to.
    pub listen_addr: String,

    /// File holding the accumulator leaves, one `0x`-prefixed 32-byte hex hash per line, in
    /// append order. Lines are only ever appended to it.
    pub leaves_path: PathBuf,

    /// How often the leaves file is checked for new leaves, in milliseconds.
    pub refresh_interval_ms: u64,
}

impl Config {
    /// Checks the values a valid TOML file can still get wrong.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }

    pub(crate) fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
