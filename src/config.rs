//! Node configuration parameters
//!
//! Everything the node needs at construction time. Hosts usually build this
//! from defaults or load it from a JSON file next to the firmware image.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default heartbeat period in emulated milliseconds.
pub const HEARTBEAT_PERIOD_MS: u32 = 1000;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Log every routed port write and serial byte at debug level.
    pub debug: bool,
    /// Heartbeat period (emulated milliseconds)
    pub heartbeat_period_ms: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            debug: false,
            heartbeat_period_ms: HEARTBEAT_PERIOD_MS,
        }
    }
}

impl NodeConfig {
    /// Reject values the node cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.heartbeat_period_ms == 0 {
            return Err(Error::Config("heartbeat_period_ms must be non-zero"));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            log::warn!("config: JSON parse failed: {}", e);
            Error::Config("invalid JSON")
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Flash image file paired with a firmware image: the firmware path with its
/// extension replaced by `.flash` (`blink.sky` -> `blink.flash`).
pub fn flash_image_for(firmware: &str) -> String {
    let stem = match firmware.rfind('.') {
        Some(ix) if ix > 0 => &firmware[..ix],
        _ => firmware,
    };
    format!("{stem}.flash")
}
