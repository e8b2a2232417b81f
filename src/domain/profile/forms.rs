//! Signup and login form models with local shape validation.
//!
//! Failures here block submission and are reported inline; they never reach
//! the authentication provider.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::Identity;

/// Minimum password length accepted by the signup form.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Fields collected by the signup screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

impl SignUpForm {
    /// Checks every field, returning the first failure in screen order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::invalid_format(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::invalid_format(
                "confirm_password",
                "passwords do not match",
            ));
        }
        if !self.agree_to_terms {
            return Err(ValidationError::invalid_format(
                "agree_to_terms",
                "terms must be accepted",
            ));
        }
        Ok(())
    }

    /// The contact details this form contributes to the profile.
    pub fn identity(&self) -> Identity {
        Identity::new(self.name.trim(), self.email.trim(), self.phone.trim())
    }
}

/// Fields collected by the login screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::empty_field("password"));
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::invalid_format("email", "expected name@domain")),
    }
}

/// E.164-style: leading `+` then 8 to 15 digits.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::empty_field("phone"));
    }
    let digits = phone
        .strip_prefix('+')
        .ok_or_else(|| ValidationError::invalid_format("phone", "must start with +"))?;
    if !(8..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format("phone", "expected 8 to 15 digits"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignUpForm {
        SignUpForm {
            name: "Jane Doe".into(),
            email: "j@x.com".into(),
            phone: "+15551234567".into(),
            password: "secret123".into(),
            confirm_password: "secret123".into(),
            agree_to_terms: true,
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(valid_signup().validate().is_ok());
    }

    #[test]
    fn password_mismatch_is_reported() {
        let form = SignUpForm {
            confirm_password: "secret124".into(),
            ..valid_signup()
        };
        assert_eq!(form.validate().unwrap_err().field(), "confirm_password");
    }

    #[test]
    fn terms_must_be_accepted() {
        let form = SignUpForm {
            agree_to_terms: false,
            ..valid_signup()
        };
        assert_eq!(form.validate().unwrap_err().field(), "agree_to_terms");
    }

    #[test]
    fn phone_must_be_international() {
        let form = SignUpForm {
            phone: "5551234567".into(),
            ..valid_signup()
        };
        assert_eq!(form.validate().unwrap_err().field(), "phone");
    }

    #[test]
    fn short_password_is_rejected() {
        let form = SignUpForm {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..valid_signup()
        };
        assert_eq!(form.validate().unwrap_err().field(), "password");
    }

    #[test]
    fn identity_is_trimmed() {
        let form = SignUpForm {
            name: "  Jane Doe ".into(),
            ..valid_signup()
        };
        assert_eq!(form.identity().name, "Jane Doe");
    }

    #[test]
    fn sign_in_requires_email_shape() {
        let form = SignInForm {
            email: "jane".into(),
            password: "pw".into(),
        };
        assert_eq!(form.validate().unwrap_err().field(), "email");
    }
}
