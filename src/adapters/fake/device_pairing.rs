use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;

use crate::domain::device::DeviceHandle;
use crate::ports::{DevicePairing, DeviceStream, PairingError, PairingSession};

use super::FailureQueue;

/// A fixed set of nearby devices.
#[derive(Debug, Default)]
pub struct FakeDevicePairing {
    devices: RwLock<Vec<DeviceHandle>>,
    /// Device ids that refuse connections.
    unreachable: RwLock<HashSet<String>>,
    open_sessions: RwLock<Vec<String>>,
    scan_failures: FailureQueue<PairingError>,
    connect_failures: FailureQueue<PairingError>,
    scans: AtomicUsize,
}

impl FakeDevicePairing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(self, device: DeviceHandle) -> Self {
        self.devices.write().unwrap().push(device);
        self
    }

    /// Makes connect attempts to `device` fail.
    pub fn with_unreachable(self, device: &DeviceHandle) -> Self {
        self.unreachable
            .write()
            .unwrap()
            .insert(device.id.as_str().to_string());
        self
    }

    pub fn with_scan_failures(self, error: PairingError, times: usize) -> Self {
        self.scan_failures.push(error, times);
        self
    }

    pub fn with_connect_failures(self, error: PairingError, times: usize) -> Self {
        self.connect_failures.push(error, times);
        self
    }

    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    /// Ids of devices with an open session.
    pub fn open_sessions(&self) -> Vec<String> {
        self.open_sessions.read().unwrap().clone()
    }
}

#[async_trait]
impl DevicePairing for FakeDevicePairing {
    async fn scan(&self, _timeout: Duration) -> Result<DeviceStream, PairingError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.scan_failures.next() {
            return Err(error);
        }
        let devices = self.devices.read().unwrap().clone();
        Ok(Box::pin(stream::iter(devices)))
    }

    async fn connect(&self, device: &DeviceHandle) -> Result<PairingSession, PairingError> {
        if let Some(error) = self.connect_failures.next() {
            return Err(error);
        }
        if self.unreachable.read().unwrap().contains(device.id.as_str()) {
            return Err(PairingError::connection_failed(
                device.id.as_str(),
                "device did not respond",
            ));
        }
        self.open_sessions
            .write()
            .unwrap()
            .push(device.id.as_str().to_string());
        Ok(PairingSession::new(device.clone()))
    }

    async fn disconnect(&self, session: &PairingSession) -> Result<(), PairingError> {
        self.open_sessions
            .write()
            .unwrap()
            .retain(|id| id != session.device.id.as_str());
        Ok(())
    }
}
