//! Navigation-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

use super::ScreenKey;

/// Why a navigation intent was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No edge from `from` to `to` in the transition table.
    InvalidTransition { from: ScreenKey, to: ScreenKey },
    /// The target exists but its entry precondition is unmet.
    PreconditionUnmet { screen: ScreenKey, reason: String },
    /// `back` or `cancel` from a screen without such an edge.
    NoReturnEdge { from: ScreenKey },
    /// Profile updates after onboarding completed.
    ProfileFrozen,
    /// Phone verification can only be recorded from an accepted code.
    VerificationRequired,
    /// A step's input failed its shape rules.
    Validation(ValidationError),
}

impl NavigationError {
    pub fn invalid_transition(from: ScreenKey, to: ScreenKey) -> Self {
        NavigationError::InvalidTransition { from, to }
    }

    pub fn precondition_unmet(screen: ScreenKey, reason: impl Into<String>) -> Self {
        NavigationError::PreconditionUnmet {
            screen,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            NavigationError::InvalidTransition { .. }
            | NavigationError::PreconditionUnmet { .. }
            | NavigationError::NoReturnEdge { .. }
            | NavigationError::ProfileFrozen => ErrorCode::InvalidTransition,
            NavigationError::VerificationRequired => ErrorCode::PermissionDenied,
            NavigationError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }

    pub fn message(&self) -> String {
        match self {
            NavigationError::InvalidTransition { from, to } => {
                format!("No transition from '{}' to '{}'", from, to)
            }
            NavigationError::PreconditionUnmet { screen, reason } => {
                format!("Cannot enter '{}': {}", screen, reason)
            }
            NavigationError::NoReturnEdge { from } => {
                format!("Screen '{}' has no return edge", from)
            }
            NavigationError::ProfileFrozen => {
                "Profile is frozen once onboarding completes".to_string()
            }
            NavigationError::VerificationRequired => {
                "Phone is verified only by an accepted one-time code".to_string()
            }
            NavigationError::Validation(err) => err.to_string(),
        }
    }
}

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for NavigationError {}

impl From<ValidationError> for NavigationError {
    fn from(err: ValidationError) -> Self {
        NavigationError::Validation(err)
    }
}

impl From<NavigationError> for DomainError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::Validation(inner) => inner.into(),
            NavigationError::InvalidTransition { from, to } => {
                DomainError::new(err.code(), err.message())
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            NavigationError::PreconditionUnmet { screen, .. } => {
                DomainError::new(err.code(), err.message()).with_detail("screen", screen.as_str())
            }
            other => DomainError::new(other.code(), other.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_errors_map_to_invalid_transition_code() {
        let err = NavigationError::invalid_transition(ScreenKey::Start, ScreenKey::Dashboard);
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
        assert_eq!(err.to_string(), "No transition from 'start' to 'dashboard'");

        let domain: DomainError = err.into();
        assert_eq!(domain.detail("to"), Some("dashboard"));
    }

    #[test]
    fn validation_keeps_validation_code() {
        let err: NavigationError = ValidationError::empty_field("goal").into();
        let domain: DomainError = err.into();
        assert_eq!(domain.code, ErrorCode::ValidationFailed);
        assert_eq!(domain.detail("field"), Some("goal"));
    }

    #[test]
    fn verification_required_is_permission_denied() {
        let domain: DomainError = NavigationError::VerificationRequired.into();
        assert_eq!(domain.code, ErrorCode::PermissionDenied);
    }
}
