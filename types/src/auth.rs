//! Sign-in and sign-up form validation.
//!
//! Raw forms are validated into `ValidSignIn` / `ValidSignUp`, which are the
//! only types the client accepts for auth requests.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const PASSWORD_MIN_CHARS: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters")]
    NameLength,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {PASSWORD_MIN_CHARS} characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Validated sign-in request, serialized as the `/auth/signin` body.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ValidSignIn {
    email: String,
    password: String,
}

/// Validated sign-up request, serialized as the `/auth/signup` body.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ValidSignUp {
    fullname: String,
    email: String,
    password: String,
}

impl ValidSignIn {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl ValidSignUp {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.fullname
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Passwords never reach logs through Debug.
macro_rules! redacted_debug {
    ($ty:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    .finish_non_exhaustive()
            }
        }
    };
}

redacted_debug!(SignInForm { email });
redacted_debug!(SignUpForm { name, email });
redacted_debug!(ValidSignIn { email });
redacted_debug!(ValidSignUp { fullname, email });

fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    if EMAIL_RE.is_match(&email) {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

impl SignInForm {
    pub fn validate(&self) -> Result<ValidSignIn, ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(ValidSignIn {
            email: normalize_email(&self.email)?,
            password: self.password.clone(),
        })
    }
}

impl SignUpForm {
    pub fn validate(&self) -> Result<ValidSignUp, ValidationError> {
        let name = self.name.trim();
        if name.is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }

        let name_chars = name.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_chars) {
            return Err(ValidationError::NameLength);
        }
        let email = normalize_email(&self.email)?;
        if self.password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(ValidSignUp {
            fullname: name.to_string(),
            email,
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(name: &str, email: &str, password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn sign_up_normalizes_name_and_email() {
        let valid = sign_up("  Ada Lovelace ", " Ada@Example.COM ", "secret1", "secret1")
            .validate()
            .unwrap();
        assert_eq!(valid.name(), "Ada Lovelace");
        assert_eq!(valid.email(), "ada@example.com");
    }

    #[test]
    fn sign_up_rejects_short_name() {
        let err = sign_up("A", "a@b.io", "secret1", "secret1").validate().unwrap_err();
        assert_eq!(err, ValidationError::NameLength);
    }

    #[test]
    fn sign_up_rejects_long_name() {
        let name = "x".repeat(101);
        let err = sign_up(&name, "a@b.io", "secret1", "secret1").validate().unwrap_err();
        assert_eq!(err, ValidationError::NameLength);
    }

    #[test]
    fn sign_up_rejects_mismatched_passwords() {
        let err = sign_up("Ada", "a@b.io", "secret1", "secret2").validate().unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn sign_up_rejects_short_password() {
        let err = sign_up("Ada", "a@b.io", "12345", "12345").validate().unwrap_err();
        assert_eq!(err, ValidationError::PasswordTooShort);
    }

    #[test]
    fn invalid_emails_rejected() {
        for email in ["plain", "a@b", "a@b.c", "@example.com", "a b@example.com"] {
            let form = SignInForm {
                email: email.to_string(),
                password: "pw".to_string(),
            };
            assert_eq!(form.validate().unwrap_err(), ValidationError::InvalidEmail, "{email}");
        }
    }

    #[test]
    fn sign_in_requires_both_fields() {
        let form = SignInForm {
            email: "a@b.io".to_string(),
            password: String::new(),
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingFields);
    }

    #[test]
    fn sign_up_body_uses_fullname() {
        let valid = sign_up("Ada", "a@b.io", "secret1", "secret1").validate().unwrap();
        let body = serde_json::to_value(&valid).unwrap();
        assert_eq!(body["fullname"], "Ada");
        assert!(body.get("confirm_password").is_none());
    }

    #[test]
    fn debug_hides_password() {
        let form = SignInForm {
            email: "a@b.io".to_string(),
            password: "hunter22".to_string(),
        };
        let rendered = format!("{form:?}");
        assert!(rendered.contains("a@b.io"));
        assert!(!rendered.contains("hunter22"));
    }
}
