//! HTTP auth provider.
//!
//! | call | endpoint | success |
//! |---|---|---|
//! | `sign_in` | `POST /auth/sign-in` | `UserBody` |
//! | `sign_up` | `POST /auth/sign-up` | `UserBody` |
//! | `send_otp` | `POST /auth/otp/send` | any 2xx |
//! | `verify_otp` | `POST /auth/otp/verify` | `{"verified": bool}` |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::otp::OtpCode;
use crate::domain::profile::{Identity, SignInForm, SignUpForm};
use crate::ports::{AuthError, AuthProvider, AuthenticatedUser};

use super::{BackendClient, HttpFailure};

#[derive(Debug, Serialize)]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpBody<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct OtpBody<'a> {
    phone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    user_id: String,
    name: String,
    email: String,
    #[serde(default)]
    phone: String,
}

#[derive(Debug, Deserialize)]
struct VerifyBody {
    verified: bool,
}

impl UserBody {
    fn into_user(self) -> Result<AuthenticatedUser, AuthError> {
        let user_id =
            UserId::new(self.user_id).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Ok(AuthenticatedUser::new(
            user_id,
            Identity::new(self.name, self.email, self.phone),
        ))
    }
}

/// Auth provider backed by the companion backend.
#[derive(Debug, Clone)]
pub struct HttpAuthProvider {
    client: BackendClient,
}

impl HttpAuthProvider {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

fn auth_error(failure: HttpFailure, email: &str) -> AuthError {
    match failure {
        HttpFailure::Timeout { timeout_secs } => AuthError::Timeout { timeout_secs },
        HttpFailure::Connect(message) => AuthError::network(message),
        HttpFailure::Decode(message) => AuthError::InvalidResponse(message),
        HttpFailure::Status {
            status,
            body,
            retry_after_secs,
        } => match status {
            401 | 403 => AuthError::InvalidCredentials,
            409 => AuthError::AccountExists {
                email: email.to_string(),
            },
            429 => AuthError::RateLimited {
                retry_after_secs: retry_after_secs.unwrap_or(30),
            },
            500..=599 => AuthError::unavailable(format!("Server error {}: {}", status, body)),
            _ => AuthError::InvalidResponse(format!("Unexpected status {}: {}", status, body)),
        },
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in(&self, form: &SignInForm) -> Result<AuthenticatedUser, AuthError> {
        let email = form.email.trim();
        let request = self.client.post("auth/sign-in").json(&SignInBody {
            email,
            password: &form.password,
        });
        let body: UserBody = self
            .client
            .send_json(request)
            .await
            .map_err(|f| auth_error(f, email))?;
        body.into_user()
    }

    async fn sign_up(&self, form: &SignUpForm) -> Result<AuthenticatedUser, AuthError> {
        let identity = form.identity();
        let request = self.client.post("auth/sign-up").json(&SignUpBody {
            name: &identity.name,
            email: &identity.email,
            phone: &identity.phone,
            password: &form.password,
        });
        let body: UserBody = self
            .client
            .send_json(request)
            .await
            .map_err(|f| auth_error(f, &identity.email))?;
        body.into_user()
    }

    async fn send_otp(&self, phone: &str) -> Result<(), AuthError> {
        let request = self
            .client
            .post("auth/otp/send")
            .json(&OtpBody { phone, code: None });
        self.client
            .send(request)
            .await
            .map_err(|f| auth_error(f, ""))?;
        Ok(())
    }

    async fn verify_otp(&self, phone: &str, code: &OtpCode) -> Result<bool, AuthError> {
        let request = self.client.post("auth/otp/verify").json(&OtpBody {
            phone,
            code: Some(code.as_str()),
        });
        let body: VerifyBody = self
            .client
            .send_json(request)
            .await
            .map_err(|f| auth_error(f, ""))?;
        Ok(body.verified)
    }
}
