//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `THERAPY_COMPANION` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a runnable
//! configuration backed by the in-process fakes.
//!
//! # Example
//!
//! ```no_run
//! use therapy_companion::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend mode: {:?}", config.backend.mode);
//! ```

mod backend;
mod device;
mod error;
mod navigation;
mod retry;
mod telemetry;

pub use backend::{BackendMode, BackendSettings};
pub use device::PairingConfig;
pub use error::{ConfigError, ValidationError};
pub use navigation::{NavigationConfig, OtpConfig};
pub use retry::RetrySettings;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

use crate::application::handlers::OnboardingOptions;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Missing-profile-type policy
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// OTP resend cooldown
    #[serde(default)]
    pub otp: OtpConfig,

    /// Backoff for collaborator calls
    #[serde(default)]
    pub retry: RetrySettings,

    /// Fake or HTTP collaborators
    #[serde(default)]
    pub backend: BackendSettings,

    /// Bluetooth scan bounds
    #[serde(default)]
    pub pairing: PairingConfig,

    /// Log filter and format
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `THERAPY_COMPANION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `THERAPY_COMPANION__BACKEND__MODE=http` -> `backend.mode = http`
    /// - `THERAPY_COMPANION__OTP__RESEND_COOLDOWN_SECS=45` -> `otp.resend_cooldown_secs = 45`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("THERAPY_COMPANION")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.otp.validate()?;
        self.retry.validate()?;
        self.backend.validate()?;
        self.pairing.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }

    /// Options for the onboarding service.
    pub fn onboarding_options(&self) -> OnboardingOptions {
        OnboardingOptions {
            policy: self.navigation.policy(),
            retry: self.retry.to_retry_config(),
            resend_cooldown_secs: self.otp.resend_cooldown_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::navigation::MissingPreconditionPolicy;
    use crate::domain::profile::ProfileType;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "THERAPY_COMPANION__NAVIGATION__ON_MISSING_PRECONDITION",
        "THERAPY_COMPANION__NAVIGATION__DEFAULT_PROFILE_TYPE",
        "THERAPY_COMPANION__OTP__RESEND_COOLDOWN_SECS",
        "THERAPY_COMPANION__RETRY__MAX_RETRIES",
        "THERAPY_COMPANION__BACKEND__MODE",
        "THERAPY_COMPANION__BACKEND__BASE_URL",
        "THERAPY_COMPANION__BACKEND__API_KEY",
        "THERAPY_COMPANION__PAIRING__SCAN_TIMEOUT_MS",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.backend.mode, BackendMode::Fake);
        assert_eq!(config.otp.resend_cooldown_secs, 30);
        assert_eq!(config.pairing.scan_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_navigation_policy_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("THERAPY_COMPANION__NAVIGATION__ON_MISSING_PRECONDITION", "reject");
        env::set_var("THERAPY_COMPANION__NAVIGATION__DEFAULT_PROFILE_TYPE", "coach");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.navigation.on_missing_precondition,
            MissingPreconditionPolicy::Reject
        );
        assert_eq!(config.navigation.default_profile_type, ProfileType::Coach);
    }

    #[test]
    fn test_http_backend_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("THERAPY_COMPANION__BACKEND__MODE", "http");
        env::set_var("THERAPY_COMPANION__BACKEND__BASE_URL", "https://api.example.com");
        env::set_var("THERAPY_COMPANION__BACKEND__API_KEY", "tc_test_xxx");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.backend.is_http());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_backend_without_url_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("THERAPY_COMPANION__BACKEND__MODE", "http");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_numeric_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("THERAPY_COMPANION__OTP__RESEND_COOLDOWN_SECS", "45");
        env::set_var("THERAPY_COMPANION__RETRY__MAX_RETRIES", "1");
        let result = AppConfig::load();
        clear_env();

        let options = result.unwrap().onboarding_options();
        assert_eq!(options.resend_cooldown_secs, 45);
        assert_eq!(options.retry.max_retries, 1);
    }
}
