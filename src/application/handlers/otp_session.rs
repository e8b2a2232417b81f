//! OtpSession - the OTP screen's gate, resend countdown and verification.
//!
//! The countdown runs as a [`ScopedTask`] ticking once per second. Dropping
//! the session (leaving the screen) aborts it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::application::in_flight::InFlight;
use crate::application::retry::{retry_transient, RetryConfig};
use crate::application::scope::ScopedTask;
use crate::domain::foundation::DomainError;
use crate::domain::otp::{EntryOutcome, OtpCode, OtpGate, OtpState, ResendOutcome};
use crate::ports::AuthProvider;

/// Snapshot of the gate after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpProgress {
    pub state: OtpState,
    pub focus: usize,
    pub filled: usize,
}

impl OtpProgress {
    fn of(gate: &OtpGate) -> Self {
        Self {
            state: gate.state(),
            focus: gate.focus(),
            filled: gate.filled_count(),
        }
    }
}

/// Live OTP screen.
pub struct OtpSession {
    auth: Arc<dyn AuthProvider>,
    phone: String,
    gate: Arc<Mutex<OtpGate>>,
    countdown: Mutex<Option<ScopedTask>>,
    resending: InFlight,
    retry: RetryConfig,
}

impl OtpSession {
    /// Opens the screen for `phone` and starts the resend countdown.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(
        auth: Arc<dyn AuthProvider>,
        phone: impl Into<String>,
        resend_cooldown_secs: u32,
        retry: RetryConfig,
    ) -> Self {
        let gate = Arc::new(Mutex::new(OtpGate::new(resend_cooldown_secs)));
        let session = Self {
            auth,
            phone: phone.into(),
            gate,
            countdown: Mutex::new(None),
            resending: InFlight::new("otp resend"),
            retry,
        };
        session.restart_countdown();
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn state(&self) -> OtpState {
        self.gate().state()
    }

    pub fn progress(&self) -> OtpProgress {
        OtpProgress::of(&self.gate())
    }

    pub fn resend_remaining_secs(&self) -> u32 {
        self.gate().resend_remaining_secs()
    }

    pub fn can_resend(&self) -> bool {
        self.gate().can_resend()
    }

    /// Copy of the gate for rendering.
    pub fn snapshot(&self) -> OtpGate {
        self.gate().clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Types a character into a slot; verifies the code once all six slots
    /// are filled.
    pub async fn enter(&self, slot: usize, ch: char) -> Result<OtpProgress, DomainError> {
        let outcome = self.gate().enter(slot, ch)?;
        self.follow(outcome).await
    }

    pub async fn paste(&self, text: &str) -> Result<OtpProgress, DomainError> {
        let outcome = self.gate().paste(text)?;
        self.follow(outcome).await
    }

    pub fn backspace(&self, slot: usize) -> Result<OtpProgress, DomainError> {
        let mut gate = self.gate();
        gate.backspace(slot)?;
        Ok(OtpProgress::of(&gate))
    }

    /// Submits the entered code again after a failed verification call.
    pub async fn retry_submit(&self) -> Result<OtpProgress, DomainError> {
        let outcome = self.gate().resubmit();
        self.follow(outcome).await
    }

    /// Requests a new code once the countdown has reached zero.
    ///
    /// The countdown restarts and the digits clear only after the provider
    /// sent the code; a failed send leaves resend available.
    pub async fn resend(&self) -> Result<ResendOutcome, DomainError> {
        let remaining_secs = self.resend_remaining_secs();
        if remaining_secs > 0 {
            debug!(remaining_secs, "resend ignored during cooldown");
            return Ok(ResendOutcome::CoolingDown { remaining_secs });
        }
        let _token = self.resending.begin()?;

        retry_transient(&self.retry, "send_otp", || self.auth.send_otp(&self.phone)).await?;
        let outcome = self.gate().resend();
        if outcome == ResendOutcome::Restarted {
            self.restart_countdown();
            info!("otp resent");
        }
        Ok(outcome)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn gate(&self) -> MutexGuard<'_, OtpGate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn follow(&self, outcome: EntryOutcome) -> Result<OtpProgress, DomainError> {
        match outcome {
            EntryOutcome::Submit(code) => self.verify(code).await,
            EntryOutcome::Focus(_) | EntryOutcome::Locked => Ok(self.progress()),
        }
    }

    async fn verify(&self, code: OtpCode) -> Result<OtpProgress, DomainError> {
        info!("otp submitted");
        let verdict = retry_transient(&self.retry, "verify_otp", || {
            self.auth.verify_otp(&self.phone, &code)
        })
        .await;

        let mut gate = self.gate();
        match verdict {
            Ok(accepted) => {
                let state = gate.resolve(accepted)?;
                info!(?state, "otp resolved");
                Ok(OtpProgress::of(&gate))
            }
            Err(err) => {
                warn!(error = %err, "otp verification unavailable");
                gate.cancel_submit()?;
                Err(err.into())
            }
        }
    }

    fn restart_countdown(&self) {
        let gate = Arc::clone(&self.gate);
        let task = ScopedTask::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let remaining = gate.lock().unwrap_or_else(PoisonError::into_inner).tick();
                if remaining == 0 {
                    break;
                }
            }
        });
        *self.countdown.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);
    }
}
