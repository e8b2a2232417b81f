//! Error types for the domain layer.
//!
//! Two layers of errors exist:
//!
//! - [`ValidationError`] - local shape rules on a single value or form field.
//!   These never leave the screen that produced them.
//! - [`DomainError`] - the error handed back by application handlers, tagged
//!   with an [`ErrorCode`] so the presentation layer can choose between an
//!   inline message, a dedicated full-screen state, or a retry affordance.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction and form validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' must be one of [{allowed}], got '{actual}'")]
    NotAllowed {
        field: String,
        allowed: String,
        actual: String,
    },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for a value outside an allowed option set.
    pub fn not_allowed(field: impl Into<String>, allowed: &[&str], actual: impl Into<String>) -> Self {
        ValidationError::NotAllowed {
            field: field.into(),
            allowed: allowed.join(", "),
            actual: actual.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

/// Error codes organized by how the presentation layer surfaces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Local input errors (inline / alert)
    ValidationFailed,
    OtpRejected,

    // Platform refusals (dedicated screen state)
    PermissionDenied,

    // External services (retry affordance)
    CollaboratorUnavailable,

    // Flow errors
    InvalidTransition,
    OperationPending,
    NotFound,

    // Everything else
    InternalError,
}

impl ErrorCode {
    /// Returns true if the UI should offer a retry affordance.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::CollaboratorUnavailable)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::OtpRejected => "OTP_REJECTED",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::CollaboratorUnavailable => "COLLABORATOR_UNAVAILABLE",
            ErrorCode::InvalidTransition => "INVALID_TRANSITION",
            ErrorCode::OperationPending => "OPERATION_PENDING",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Creates an error for an external service that failed or timed out.
    pub fn collaborator_unavailable(collaborator: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CollaboratorUnavailable, message)
            .with_detail("collaborator", collaborator)
    }

    /// Creates an error for a platform permission refusal.
    pub fn permission_denied(capability: &str) -> Self {
        Self::new(
            ErrorCode::PermissionDenied,
            format!("{} access was denied", capability),
        )
        .with_detail("capability", capability)
    }

    /// Creates an error for a trigger fired while a previous one is pending.
    pub fn operation_pending(operation: &str) -> Self {
        Self::new(
            ErrorCode::OperationPending,
            format!("{} is already in progress", operation),
        )
        .with_detail("operation", operation)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns a detail value by key.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::validation(field, err.to_string())
    }
}
