//! Fake auth provider.
//!
//! # Example
//!
//! ```ignore
//! let auth = FakeAuthProvider::new()
//!     .with_account("j@x.com", "secret123", Identity::new("Jane", "j@x.com", "+15551234567"))
//!     .with_valid_code("654321");
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::otp::OtpCode;
use crate::domain::profile::{Identity, SignInForm, SignUpForm};
use crate::ports::{AuthError, AuthProvider, AuthenticatedUser};

use super::{simulate_latency, FailureQueue};

/// Code the fake accepts unless configured otherwise.
pub const DEFAULT_VALID_CODE: &str = "123456";

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user: AuthenticatedUser,
}

/// In-memory accounts and a single accepted one-time code.
#[derive(Debug)]
pub struct FakeAuthProvider {
    /// Accounts keyed by lowercase email.
    accounts: RwLock<HashMap<String, Account>>,
    valid_code: RwLock<String>,
    /// Phones a code was sent to, in order.
    sent_codes: RwLock<Vec<String>>,
    failures: FailureQueue<AuthError>,
    delay: Duration,
    calls: AtomicUsize,
    next_user: AtomicUsize,
}

impl Default for FakeAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeAuthProvider {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            valid_code: RwLock::new(DEFAULT_VALID_CODE.to_string()),
            sent_codes: RwLock::new(Vec::new()),
            failures: FailureQueue::default(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            next_user: AtomicUsize::new(1),
        }
    }

    /// Registers an existing account.
    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        identity: Identity,
    ) -> Self {
        let email = email.into().to_lowercase();
        let user_id = self.allocate_user_id();
        if let Ok(user_id) = user_id {
            self.accounts.write().unwrap().insert(
                email,
                Account {
                    password: password.into(),
                    user: AuthenticatedUser::new(user_id, identity),
                },
            );
        }
        self
    }

    /// Sets the code `verify_otp` accepts.
    pub fn with_valid_code(self, code: impl Into<String>) -> Self {
        *self.valid_code.write().unwrap() = code.into();
        self
    }

    /// Fails the next `times` calls with `error`.
    pub fn with_failures(self, error: AuthError, times: usize) -> Self {
        self.failures.push(error, times);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a failure at runtime.
    pub fn fail_next(&self, error: AuthError, times: usize) {
        self.failures.push(error, times);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Phones a code was sent to, oldest first.
    pub fn sent_codes(&self) -> Vec<String> {
        self.sent_codes.read().unwrap().clone()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.read().unwrap().len()
    }

    fn allocate_user_id(&self) -> Result<UserId, AuthError> {
        let n = self.next_user.fetch_add(1, Ordering::SeqCst);
        UserId::new(format!("user-{}", n)).map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }

    async fn begin_call(&self) -> Result<(), AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        simulate_latency(self.delay).await;
        match self.failures.next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_in(&self, form: &SignInForm) -> Result<AuthenticatedUser, AuthError> {
        self.begin_call().await?;
        let accounts = self.accounts.read().unwrap();
        match accounts.get(&form.email.trim().to_lowercase()) {
            Some(account) if account.password == form.password => Ok(account.user.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_up(&self, form: &SignUpForm) -> Result<AuthenticatedUser, AuthError> {
        self.begin_call().await?;
        let email = form.email.trim().to_lowercase();
        if self.accounts.read().unwrap().contains_key(&email) {
            return Err(AuthError::AccountExists { email });
        }
        let user = AuthenticatedUser::new(self.allocate_user_id()?, form.identity());
        self.accounts.write().unwrap().insert(
            email,
            Account {
                password: form.password.clone(),
                user: user.clone(),
            },
        );
        Ok(user)
    }

    async fn send_otp(&self, phone: &str) -> Result<(), AuthError> {
        self.begin_call().await?;
        self.sent_codes.write().unwrap().push(phone.to_string());
        Ok(())
    }

    async fn verify_otp(&self, _phone: &str, code: &OtpCode) -> Result<bool, AuthError> {
        self.begin_call().await?;
        Ok(code.as_str() == self.valid_code.read().unwrap().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane_signup() -> SignUpForm {
        SignUpForm {
            name: "Jane Doe".into(),
            email: "j@x.com".into(),
            phone: "+15551234567".into(),
            password: "secret123".into(),
            confirm_password: "secret123".into(),
            agree_to_terms: true,
        }
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let auth = FakeAuthProvider::new();
        let created = auth.sign_up(&jane_signup()).await.unwrap();
        assert_eq!(created.identity.name, "Jane Doe");

        let form = SignInForm {
            email: "J@X.com".into(),
            password: "secret123".into(),
        };
        assert_eq!(auth.sign_in(&form).await.unwrap(), created);
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_refused() {
        let auth = FakeAuthProvider::new();
        auth.sign_up(&jane_signup()).await.unwrap();
        assert!(matches!(
            auth.sign_up(&jane_signup()).await,
            Err(AuthError::AccountExists { .. })
        ));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let auth = FakeAuthProvider::new().with_account(
            "a@b.co",
            "right-pass",
            Identity::new("A", "a@b.co", "+15550000000"),
        );
        let form = SignInForm {
            email: "a@b.co".into(),
            password: "wrong-pass".into(),
        };
        assert_eq!(auth.sign_in(&form).await, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn verify_otp_checks_configured_code() {
        let auth = FakeAuthProvider::new().with_valid_code("654321");
        let good = OtpCode::parse("654321").unwrap();
        let bad = OtpCode::parse("123456").unwrap();
        assert!(auth.verify_otp("+1555", &good).await.unwrap());
        assert!(!auth.verify_otp("+1555", &bad).await.unwrap());
    }

    #[tokio::test]
    async fn queued_failures_are_consumed_in_order() {
        let auth = FakeAuthProvider::new().with_failures(AuthError::network("reset"), 2);
        assert!(auth.send_otp("+1555").await.is_err());
        assert!(auth.send_otp("+1555").await.is_err());
        assert!(auth.send_otp("+1555").await.is_ok());
        assert_eq!(auth.call_count(), 3);
        assert_eq!(auth.sent_codes(), vec!["+1555".to_string()]);
    }
}
