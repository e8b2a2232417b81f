use serde::{Deserialize, Serialize};

use crate::domain::foundation::DeviceId;

/// A device seen during a pairing scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceHandle {
    pub id: DeviceId,
    pub name: String,
    /// Signal strength in dBm, when the platform reports it.
    pub rssi: Option<i16>,
}

impl DeviceHandle {
    pub fn new(id: DeviceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rssi: None,
        }
    }

    pub fn with_rssi(mut self, rssi: i16) -> Self {
        self.rssi = Some(rssi);
        self
    }
}
