//! OTP module - one-time code entry and resend countdown.

mod code;
mod gate;

pub use code::{OtpCode, OTP_LENGTH};
pub use gate::{EntryOutcome, OtpGate, OtpState, ResendOutcome, DEFAULT_RESEND_COOLDOWN_SECS};
