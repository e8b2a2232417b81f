//! Auth provider port - sign-in, sign-up and phone verification.
//!
//! The app never decides on its own whether credentials or a one-time code
//! are correct; every such decision is delegated here.
//!
//! # Example
//!
//! ```ignore
//! async fn verify(auth: Arc<dyn AuthProvider>, phone: &str, code: &OtpCode) -> bool {
//!     auth.verify_otp(phone, code).await.unwrap_or(false)
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::otp::OtpCode;
use crate::domain::profile::{Identity, SignInForm, SignUpForm};

/// Authentication backend.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidCredentials` for a wrong email/password pair
/// - Return `Ok(false)` from `verify_otp` for a wrong code (not an error)
/// - Return a transient error variant for network failures and timeouts
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Signs an existing user in.
    async fn sign_in(&self, form: &SignInForm) -> Result<AuthenticatedUser, AuthError>;

    /// Registers a new account.
    async fn sign_up(&self, form: &SignUpForm) -> Result<AuthenticatedUser, AuthError>;

    /// Sends a one-time code to `phone`.
    async fn send_otp(&self, phone: &str) -> Result<(), AuthError>;

    /// Checks a one-time code. `Ok(false)` means the code was wrong.
    async fn verify_otp(&self, phone: &str, code: &OtpCode) -> Result<bool, AuthError>;
}

/// A user the provider has authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub identity: Identity,
}

impl AuthenticatedUser {
    pub fn new(user_id: UserId, identity: Identity) -> Self {
        Self { user_id, identity }
    }
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Email/password pair not recognized.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Sign-up for an email that already has an account.
    #[error("an account already exists for {email}")]
    AccountExists { email: String },

    /// Too many code requests or attempts.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is down.
    #[error("auth service unavailable: {0}")]
    Unavailable(String),

    /// Could not reach the provider.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Provider answered with something unexpected.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Returns true if the same call may succeed when retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AuthError::RateLimited { .. }
                | AuthError::Unavailable(_)
                | AuthError::Network(_)
                | AuthError::Timeout { .. }
        )
    }

    /// Returns true if the provider cannot have acted on the request, so a
    /// non-idempotent call may be sent again. A timeout may arrive after the
    /// provider already committed.
    pub fn is_safe_to_replay(&self) -> bool {
        matches!(
            self,
            AuthError::RateLimited { .. } | AuthError::Unavailable(_) | AuthError::Network(_)
        )
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::InvalidCredentials => {
                DomainError::new(ErrorCode::ValidationFailed, err.to_string())
                    .with_detail("field", "password")
            }
            AuthError::AccountExists { .. } => {
                DomainError::new(ErrorCode::ValidationFailed, err.to_string())
                    .with_detail("field", "email")
            }
            _ => DomainError::collaborator_unavailable("auth", err.to_string()),
        }
    }
}
