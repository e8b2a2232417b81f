//! Navigation and OTP configuration

use serde::Deserialize;

use crate::domain::navigation::{MissingPreconditionPolicy, NavigationPolicy};
use crate::domain::otp::DEFAULT_RESEND_COOLDOWN_SECS;
use crate::domain::profile::ProfileType;

use super::error::ValidationError;

/// Behaviour of the navigator when a screen needs a profile type
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    /// `default` substitutes `default_profile_type`, `reject` refuses
    #[serde(default)]
    pub on_missing_precondition: MissingPreconditionPolicy,

    /// Profile type used by the `default` policy
    #[serde(default = "default_profile_type")]
    pub default_profile_type: ProfileType,
}

impl NavigationConfig {
    pub fn policy(&self) -> NavigationPolicy {
        NavigationPolicy {
            on_missing_precondition: self.on_missing_precondition,
            default_profile_type: self.default_profile_type,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            on_missing_precondition: MissingPreconditionPolicy::default(),
            default_profile_type: default_profile_type(),
        }
    }
}

/// OTP screen configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    /// Seconds before "resend code" becomes available
    #[serde(default = "default_resend_cooldown")]
    pub resend_cooldown_secs: u32,
}

impl OtpConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resend_cooldown_secs == 0 || self.resend_cooldown_secs > 600 {
            return Err(ValidationError::InvalidResendCooldown);
        }
        Ok(())
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            resend_cooldown_secs: default_resend_cooldown(),
        }
    }
}

fn default_profile_type() -> ProfileType {
    ProfileType::Athlete
}

fn default_resend_cooldown() -> u32 {
    DEFAULT_RESEND_COOLDOWN_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_defaults() {
        let config = NavigationConfig::default();
        assert_eq!(config.policy(), NavigationPolicy::default());
    }

    #[test]
    fn test_reject_policy() {
        let config = NavigationConfig {
            on_missing_precondition: MissingPreconditionPolicy::Reject,
            ..Default::default()
        };
        assert_eq!(config.policy(), NavigationPolicy::strict());
    }

    #[test]
    fn test_otp_cooldown_bounds() {
        assert!(OtpConfig::default().validate().is_ok());
        assert_eq!(
            OtpConfig { resend_cooldown_secs: 0 }.validate(),
            Err(ValidationError::InvalidResendCooldown)
        );
    }
}
