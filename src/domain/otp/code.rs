//! OtpCode value object - exactly six ASCII digits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Number of digits in a one-time code.
pub const OTP_LENGTH: usize = 6;

/// A complete one-time code, validated for shape only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OtpCode(String);

impl OtpCode {
    /// Parses a code, requiring exactly [`OTP_LENGTH`] digits `0`-`9`.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        if code.len() != OTP_LENGTH {
            return Err(ValidationError::invalid_format(
                "otp",
                format!("expected {} digits, got {}", OTP_LENGTH, code.chars().count()),
            ));
        }
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("otp", "digits only"));
        }
        Ok(Self(code.to_string()))
    }

    pub(crate) fn from_digits(digits: &[u8; OTP_LENGTH]) -> Self {
        Self(digits.iter().map(|d| char::from(b'0' + d)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OtpCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OtpCode> for String {
    fn from(code: OtpCode) -> Self {
        code.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
