//! Capped exponential backoff for collaborator calls.
//!
//! Transient failures (timeouts, network errors, 5xx, rate limits) are
//! retried up to `max_retries` times. The last error is returned unchanged so
//! the caller can convert it into a `CollaboratorUnavailable` domain error.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::ports::{
    AuthError, CaptureError, InferenceError, NotificationError, PairingError, SpeechError,
};

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call (default: 3).
    pub max_retries: u32,
    /// Delay before the first retry (default: 500ms).
    pub base_delay: Duration,
    /// Upper bound for any single delay (default: 8 seconds).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Errors that know whether a retry may help.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

macro_rules! impl_transient {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Transient for $ty {
                fn is_transient(&self) -> bool {
                    <$ty>::is_transient(self)
                }
            }
        )*
    };
}

impl_transient!(
    AuthError,
    CaptureError,
    InferenceError,
    NotificationError,
    PairingError,
    SpeechError,
);

/// Delay before retry number `attempt` (0-indexed):
/// `min(base_delay * 2^attempt, max_delay)`.
pub fn compute_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exp = 2u64.saturating_pow(attempt);
    let base_ms = config.base_delay.as_millis() as u64;
    let raw_ms = base_ms.saturating_mul(exp);
    Duration::from_millis(raw_ms.min(config.max_delay.as_millis() as u64))
}

/// Runs `call`, retrying transient failures with backoff.
pub async fn retry_transient<T, E, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    call: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    retry_when(config, operation, |err: &E| err.is_transient(), call).await
}

/// Like [`retry_transient`], but only errors accepted by `should_retry` are
/// retried. Used for calls that must not be replayed after the request may
/// have reached the collaborator.
pub async fn retry_when<T, E, P, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    should_retry: P,
    mut call: F,
) -> Result<T, E>
where
    P: Fn(&E) -> bool,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(operation, attempt, "call succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                let retryable = should_retry(&err);
                if !retryable || attempt >= config.max_retries {
                    if retryable {
                        warn!(operation, attempts = attempt + 1, error = %err, "retries exhausted");
                    }
                    return Err(err);
                }
                let delay = compute_delay(config, attempt);
                warn!(
                    operation,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
