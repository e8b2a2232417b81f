//! DeviceConnectionHandler - scan, connect and disconnect the therapy
//! device while keeping [`ConnectionStatus`] consistent.
//!
//! Status changes go through [`StateMachine::transition_to`] and are
//! published on a `watch` channel so screens can follow them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::application::in_flight::InFlight;
use crate::application::retry::{retry_transient, RetryConfig};
use crate::domain::device::{ConnectionStatus, DeviceHandle};
use crate::domain::foundation::{DomainError, StateMachine};
use crate::ports::{DevicePairing, PairingError, PairingSession};

/// Default bound on a single scan.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DeviceConnectionHandler {
    pairing: Arc<dyn DevicePairing>,
    scan_timeout: Duration,
    retry: RetryConfig,
    status: watch::Sender<ConnectionStatus>,
    discovered: Mutex<Vec<DeviceHandle>>,
    session: Mutex<Option<PairingSession>>,
    linking: InFlight,
}

impl DeviceConnectionHandler {
    pub fn new(pairing: Arc<dyn DevicePairing>, scan_timeout: Duration, retry: RetryConfig) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Disconnected);
        Self {
            pairing,
            scan_timeout,
            retry,
            status,
            discovered: Mutex::new(Vec::new()),
            session: Mutex::new(None),
            linking: InFlight::new("device connection"),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Receives every status change from now on.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Devices found by the last scan.
    pub fn discovered(&self) -> Vec<DeviceHandle> {
        lock(&self.discovered).clone()
    }

    pub fn session(&self) -> Option<PairingSession> {
        lock(&self.session).clone()
    }

    /// Scans for nearby devices until the stream ends or the scan timeout
    /// elapses, whichever comes first.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the platform refuses Bluetooth access
    /// - `CollaboratorUnavailable` if nothing was found or the scan failed
    #[instrument(skip(self))]
    pub async fn scan(&self) -> Result<Vec<DeviceHandle>, DomainError> {
        let stream = retry_transient(&self.retry, "scan", || {
            self.pairing.scan(self.scan_timeout)
        })
        .await?;

        let found: Vec<DeviceHandle> = stream
            .take_until(tokio::time::sleep(self.scan_timeout))
            .collect()
            .await;
        info!(count = found.len(), "scan finished");

        *lock(&self.discovered) = found.clone();
        if found.is_empty() {
            return Err(PairingError::NoDeviceFound.into());
        }
        Ok(found)
    }

    /// Connects to `device`. On failure the status returns to
    /// `Disconnected`.
    #[instrument(skip_all, fields(device = %device.id))]
    pub async fn connect(&self, device: &DeviceHandle) -> Result<PairingSession, DomainError> {
        let _token = self.linking.begin()?;
        self.set_status(ConnectionStatus::Connecting)?;

        match retry_transient(&self.retry, "connect", || self.pairing.connect(device)).await {
            Ok(session) => {
                *lock(&self.session) = Some(session.clone());
                self.set_status(ConnectionStatus::Connected)?;
                info!(name = %device.name, "device connected");
                Ok(session)
            }
            Err(err) => {
                warn!(error = %err, "device connection failed");
                self.set_status(ConnectionStatus::Disconnected)?;
                Err(err.into())
            }
        }
    }

    /// Scans and connects to the strongest device found.
    pub async fn connect_nearest(&self) -> Result<PairingSession, DomainError> {
        let found = self.scan().await?;
        let nearest = found
            .into_iter()
            .max_by_key(|d| d.rssi.unwrap_or(i16::MIN))
            .ok_or(PairingError::NoDeviceFound)?;
        self.connect(&nearest).await
    }

    /// Closes the open session, if any. The status ends `Disconnected` even
    /// when the platform reports an error.
    pub async fn disconnect(&self) -> Result<(), DomainError> {
        let Some(session) = lock(&self.session).take() else {
            return Ok(());
        };
        let result = self.pairing.disconnect(&session).await;
        self.set_status(ConnectionStatus::Disconnected)?;
        info!(device = %session.device.id, "device disconnected");
        result.map_err(Into::into)
    }

    fn set_status(&self, target: ConnectionStatus) -> Result<(), DomainError> {
        let mut outcome = Ok(());
        self.status.send_if_modified(|status| match status.transition_to(target) {
            Ok(next) => {
                debug!(from = %status, to = %next, "connection status changed");
                *status = next;
                true
            }
            Err(err) => {
                outcome = Err(err);
                false
            }
        });
        outcome
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fake::FakeDevicePairing;
    use crate::domain::foundation::{DeviceId, ErrorCode};

    fn pad(id: &str, rssi: i16) -> DeviceHandle {
        DeviceHandle::new(DeviceId::new(id).unwrap(), "Therapy Pad").with_rssi(rssi)
    }

    fn handler(pairing: Arc<FakeDevicePairing>) -> DeviceConnectionHandler {
        DeviceConnectionHandler::new(pairing, DEFAULT_SCAN_TIMEOUT, RetryConfig::none())
    }

    #[tokio::test]
    async fn connect_moves_through_connecting_to_connected() {
        let pairing = Arc::new(FakeDevicePairing::new().with_device(pad("AA:01", -60)));
        let h = handler(pairing.clone());
        let mut rx = h.subscribe();

        h.connect(&pad("AA:01", -60)).await.unwrap();
        assert_eq!(h.status(), ConnectionStatus::Connected);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ConnectionStatus::Connected);
        assert_eq!(pairing.open_sessions(), vec!["AA:01".to_string()]);
    }

    #[tokio::test]
    async fn failed_connect_returns_to_disconnected() {
        let device = pad("AA:02", -70);
        let pairing = Arc::new(FakeDevicePairing::new().with_unreachable(&device));
        let h = handler(pairing);

        let err = h.connect(&device).await.unwrap_err();
        assert!(err.code.is_retryable());
        assert_eq!(h.status(), ConnectionStatus::Disconnected);
        assert!(h.session().is_none());
    }

    #[tokio::test]
    async fn connecting_twice_is_refused() {
        let device = pad("AA:03", -50);
        let h = handler(Arc::new(FakeDevicePairing::new()));
        h.connect(&device).await.unwrap();

        let err = h.connect(&device).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        assert_eq!(h.status(), ConnectionStatus::Connected);
    }

    #[tokio::test]
    async fn connect_nearest_picks_strongest_signal() {
        let pairing = Arc::new(
            FakeDevicePairing::new()
                .with_device(pad("AA:10", -80))
                .with_device(pad("AA:11", -40)),
        );
        let h = handler(pairing);
        let session = h.connect_nearest().await.unwrap();
        assert_eq!(session.device.id.as_str(), "AA:11");
        assert_eq!(h.discovered().len(), 2);
    }

    #[tokio::test]
    async fn empty_scan_reports_no_device() {
        let h = handler(Arc::new(FakeDevicePairing::new()));
        let err = h.scan().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CollaboratorUnavailable);
        assert_eq!(h.status(), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn bluetooth_refusal_is_permission_denied() {
        let pairing =
            Arc::new(FakeDevicePairing::new().with_scan_failures(PairingError::PermissionDenied, 1));
        let err = handler(pairing).scan().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn disconnect_closes_session() {
        let pairing = Arc::new(FakeDevicePairing::new());
        let h = handler(pairing.clone());
        h.connect(&pad("AA:04", -55)).await.unwrap();

        h.disconnect().await.unwrap();
        assert_eq!(h.status(), ConnectionStatus::Disconnected);
        assert!(pairing.open_sessions().is_empty());
        // second call is a no-op
        h.disconnect().await.unwrap();
    }
}
