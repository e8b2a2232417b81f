//! Deterministic in-memory collaborators.
//!
//! Used by tests and by the binary in `fake` backend mode. Every fake can be
//! scripted to fail: queued errors are returned one per call before normal
//! behaviour resumes, which is how retry paths are exercised.

mod auth;
mod device_pairing;
mod image_capture;
mod inference;
mod notification_store;
mod session_store;
mod voice;

pub use auth::{FakeAuthProvider, DEFAULT_VALID_CODE};
pub use device_pairing::FakeDevicePairing;
pub use image_capture::FakeImageCapture;
pub use inference::FakeInferenceService;
pub use notification_store::InMemoryNotificationStore;
pub use session_store::InMemorySessionStore;
pub use voice::FakeVoiceEngine;

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Errors queued for upcoming calls, consumed in order.
#[derive(Debug)]
pub(crate) struct FailureQueue<E> {
    queue: Mutex<VecDeque<E>>,
}

impl<E> Default for FailureQueue<E> {
    fn default() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }
}

impl<E: Clone> FailureQueue<E> {
    pub(crate) fn push(&self, error: E, times: usize) {
        let mut queue = self.queue.lock().unwrap();
        for _ in 0..times {
            queue.push_back(error.clone());
        }
    }

    pub(crate) fn next(&self) -> Option<E> {
        self.queue.lock().unwrap().pop_front()
    }
}

/// Sleeps for the configured latency, if any.
pub(crate) async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
