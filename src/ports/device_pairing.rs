//! Device pairing port - Bluetooth scan and connect.
//!
//! The link protocol itself is out of scope; the app only needs to discover
//! nearby therapy devices and hold a session with one of them.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;

use crate::domain::device::DeviceHandle;
use crate::domain::foundation::{DomainError, Timestamp};

/// Devices discovered during a scan, in discovery order.
pub type DeviceStream = Pin<Box<dyn Stream<Item = DeviceHandle> + Send>>;

/// Open link to a therapy device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingSession {
    pub device: DeviceHandle,
    pub connected_at: Timestamp,
}

impl PairingSession {
    pub fn new(device: DeviceHandle) -> Self {
        Self {
            device,
            connected_at: Timestamp::now(),
        }
    }
}

/// Platform Bluetooth stack.
#[async_trait]
pub trait DevicePairing: Send + Sync {
    /// Starts a scan. The stream ends when `timeout` elapses.
    async fn scan(&self, timeout: Duration) -> Result<DeviceStream, PairingError>;

    /// Connects to a discovered device.
    async fn connect(&self, device: &DeviceHandle) -> Result<PairingSession, PairingError>;

    /// Closes an open session.
    async fn disconnect(&self, session: &PairingSession) -> Result<(), PairingError>;
}

/// Pairing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairingError {
    #[error("bluetooth permission denied")]
    PermissionDenied,

    #[error("bluetooth is turned off")]
    BluetoothOff,

    #[error("no therapy device found")]
    NoDeviceFound,

    #[error("connection to {device} failed: {reason}")]
    ConnectionFailed { device: String, reason: String },

    #[error("pairing timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl PairingError {
    pub fn connection_failed(device: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            device: device.into(),
            reason: reason.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PairingError::ConnectionFailed { .. } | PairingError::Timeout { .. }
        )
    }
}

impl From<PairingError> for DomainError {
    fn from(err: PairingError) -> Self {
        match &err {
            PairingError::PermissionDenied => DomainError::permission_denied("bluetooth"),
            _ => DomainError::collaborator_unavailable("device_pairing", err.to_string()),
        }
    }
}
