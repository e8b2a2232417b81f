//! OtpGate - six-slot code entry with auto-submit and a resend countdown.
//!
//! ```text
//! AwaitingInput --[6th slot filled]--> SubmitPending
//! SubmitPending --[accepted]---------> Verified
//! SubmitPending --[refused]----------> Rejected
//! Rejected      --[any edit]---------> AwaitingInput
//! SubmitPending --[no verdict]-------> AwaitingInput   (collaborator failed)
//! ```
//!
//! The gate owns input collection, focus, the countdown, and local shape
//! checks. Whether a code is correct is decided by the authentication
//! provider; the result comes back through [`OtpGate::resolve`].
//!
//! The countdown is driven from outside: one [`OtpGate::tick`] per second.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, StateMachine, ValidationError};

use super::{OtpCode, OTP_LENGTH};

/// Default resend cooldown in seconds.
pub const DEFAULT_RESEND_COOLDOWN_SECS: u32 = 30;

/// Verification state of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpState {
    AwaitingInput,
    SubmitPending,
    Verified,
    Rejected,
}

impl StateMachine for OtpState {
    fn valid_transitions(&self) -> Vec<Self> {
        use OtpState::*;
        match self {
            AwaitingInput => vec![SubmitPending],
            SubmitPending => vec![Verified, Rejected, AwaitingInput],
            Rejected => vec![AwaitingInput],
            Verified => vec![],
        }
    }
}

/// Result of a key event on a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Input accepted; focus is now on this slot.
    Focus(usize),
    /// All slots are filled; submit this code.
    Submit(OtpCode),
    /// The gate is waiting for a verdict or already verified; input ignored.
    Locked,
}

/// Result of a resend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendOutcome {
    /// Countdown still running; nothing changed.
    CoolingDown { remaining_secs: u32 },
    /// Countdown restarted and digits cleared.
    Restarted,
}

/// Code entry state machine for the OTP screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpGate {
    slots: [Option<u8>; OTP_LENGTH],
    focus: usize,
    state: OtpState,
    resend_cooldown_secs: u32,
    resend_remaining_secs: u32,
}

impl OtpGate {
    /// Creates a gate with the countdown already running (a code was just sent).
    pub fn new(resend_cooldown_secs: u32) -> Self {
        Self {
            slots: [None; OTP_LENGTH],
            focus: 0,
            state: OtpState::AwaitingInput,
            resend_cooldown_secs,
            resend_remaining_secs: resend_cooldown_secs,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> OtpState {
        self.state
    }

    /// Index of the focused slot.
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn slots(&self) -> &[Option<u8>; OTP_LENGTH] {
        &self.slots
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn resend_remaining_secs(&self) -> u32 {
        self.resend_remaining_secs
    }

    pub fn can_resend(&self) -> bool {
        self.resend_remaining_secs == 0
    }

    fn is_locked(&self) -> bool {
        matches!(self.state, OtpState::SubmitPending | OtpState::Verified)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Types `ch` into `slot`.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `slot` is not a slot index
    /// - `InvalidFormat` if `ch` is not `0`-`9`; the slot is left unchanged
    pub fn enter(&mut self, slot: usize, ch: char) -> Result<EntryOutcome, ValidationError> {
        Self::check_slot(slot)?;
        if self.is_locked() {
            return Ok(EntryOutcome::Locked);
        }
        let digit = ch
            .to_digit(10)
            .filter(|_| ch.is_ascii_digit())
            .ok_or_else(|| ValidationError::invalid_format("otp", "digits only"))?;

        self.reopen_after_rejection();
        self.slots[slot] = Some(digit as u8);
        self.focus = (slot + 1).min(OTP_LENGTH - 1);
        Ok(self.submit_if_complete())
    }

    /// Pastes a whole code, filling slots from the first one.
    ///
    /// Non-digit characters are skipped; digits beyond the sixth are dropped.
    pub fn paste(&mut self, text: &str) -> Result<EntryOutcome, ValidationError> {
        if self.is_locked() {
            return Ok(EntryOutcome::Locked);
        }
        let digits: Vec<u8> = text
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
            .take(OTP_LENGTH)
            .collect();
        if digits.is_empty() {
            return Err(ValidationError::invalid_format("otp", "no digits to paste"));
        }

        self.reopen_after_rejection();
        self.slots = [None; OTP_LENGTH];
        for (slot, digit) in self.slots.iter_mut().zip(&digits) {
            *slot = Some(*digit);
        }
        self.focus = digits.len().min(OTP_LENGTH - 1);
        Ok(self.submit_if_complete())
    }

    /// Backspace on `slot`: clears a filled slot, or moves focus to the
    /// previous slot when this one is already empty.
    pub fn backspace(&mut self, slot: usize) -> Result<EntryOutcome, ValidationError> {
        Self::check_slot(slot)?;
        if self.is_locked() {
            return Ok(EntryOutcome::Locked);
        }
        self.reopen_after_rejection();
        if self.slots[slot].take().is_some() {
            self.focus = slot;
        } else {
            self.focus = slot.saturating_sub(1);
        }
        Ok(EntryOutcome::Focus(self.focus))
    }

    /// Records the provider's verdict on the submitted code.
    ///
    /// A rejected code is cleared so the user can start over from slot 0.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if no code is pending
    pub fn resolve(&mut self, accepted: bool) -> Result<OtpState, DomainError> {
        let target = if accepted {
            OtpState::Verified
        } else {
            OtpState::Rejected
        };
        self.state = self.state.transition_to(target)?;
        if !accepted {
            self.clear_digits();
        }
        Ok(self.state)
    }

    /// Returns a pending submission to input without a verdict, keeping the
    /// digits so the same code can be submitted again.
    pub fn cancel_submit(&mut self) -> Result<(), DomainError> {
        if self.state != OtpState::SubmitPending {
            return Err(DomainError::new(
                ErrorCode::InvalidTransition,
                format!("No submission to cancel in state {:?}", self.state),
            ));
        }
        self.state = OtpState::AwaitingInput;
        Ok(())
    }

    /// Submits the entered digits again if all slots are filled.
    pub fn resubmit(&mut self) -> EntryOutcome {
        if self.is_locked() {
            return EntryOutcome::Locked;
        }
        self.reopen_after_rejection();
        self.submit_if_complete()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resend countdown
    // ─────────────────────────────────────────────────────────────────────────

    /// Advances the countdown by one second. Returns the remaining seconds.
    pub fn tick(&mut self) -> u32 {
        self.resend_remaining_secs = self.resend_remaining_secs.saturating_sub(1);
        self.resend_remaining_secs
    }

    /// Requests a new code.
    ///
    /// Has no effect while the countdown is running. Otherwise restarts the
    /// countdown and clears the entered digits; the verification state is
    /// left as it is.
    pub fn resend(&mut self) -> ResendOutcome {
        if !self.can_resend() {
            return ResendOutcome::CoolingDown {
                remaining_secs: self.resend_remaining_secs,
            };
        }
        self.resend_remaining_secs = self.resend_cooldown_secs;
        self.clear_digits();
        ResendOutcome::Restarted
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn check_slot(slot: usize) -> Result<(), ValidationError> {
        if slot >= OTP_LENGTH {
            return Err(ValidationError::out_of_range(
                "otp_slot",
                0,
                OTP_LENGTH as i32 - 1,
                slot as i32,
            ));
        }
        Ok(())
    }

    fn reopen_after_rejection(&mut self) {
        if self.state == OtpState::Rejected {
            self.state = OtpState::AwaitingInput;
        }
    }

    fn clear_digits(&mut self) {
        self.slots = [None; OTP_LENGTH];
        self.focus = 0;
    }

    fn submit_if_complete(&mut self) -> EntryOutcome {
        let mut digits = [0u8; OTP_LENGTH];
        for (out, slot) in digits.iter_mut().zip(self.slots.iter()) {
            match slot {
                Some(d) => *out = *d,
                None => return EntryOutcome::Focus(self.focus),
            }
        }
        self.state = OtpState::SubmitPending;
        EntryOutcome::Submit(OtpCode::from_digits(&digits))
    }
}

impl Default for OtpGate {
    fn default() -> Self {
        Self::new(DEFAULT_RESEND_COOLDOWN_SECS)
    }
}
