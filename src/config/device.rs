//! Device pairing configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Bluetooth pairing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PairingConfig {
    /// Upper bound on one scan in milliseconds
    #[serde(default = "default_scan_timeout")]
    pub scan_timeout_ms: u64,
}

impl PairingConfig {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.scan_timeout_ms == 0 {
            return Err(ValidationError::InvalidScanTimeout);
        }
        Ok(())
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            scan_timeout_ms: default_scan_timeout(),
        }
    }
}

fn default_scan_timeout() -> u64 {
    10_000
}
