//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid backend URL format")]
    InvalidBackendUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Retry base delay exceeds max delay")]
    InvalidRetryDelays,

    #[error("OTP resend cooldown must be between 1 and 600 seconds")]
    InvalidResendCooldown,

    #[error("Invalid scan timeout")]
    InvalidScanTimeout,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
