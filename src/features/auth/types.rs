//! Request types for the login call. Credentials carry the raw password, so
//! they must never be logged.

use crate::app_lib::ValidationError;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

pub const USERNAME_REQUIRED: &str = "User Name is required";
pub const PASSWORD_REQUIRED: &str = "Password is required";

/// Username and password as typed. Held only until the login request resolves.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Required-field check; both fields must be non-empty after trimming.
    ///
    /// # Errors
    /// Returns a `ValidationError` naming `username`, `password`, or both.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.username.trim().is_empty() {
            errors.push("username", USERNAME_REQUIRED);
        }
        if self.password.expose_secret().trim().is_empty() {
            errors.push("password", PASSWORD_REQUIRED);
        }
        errors.into_result()
    }
}

/// Wire body for `RegisterEmployee/Login/`. Fields are sent untrimmed.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_names_password() {
        let result = Credentials::new("staff01", "   ").validate();
        let err = result.err().map(|err| err.field_names());
        assert_eq!(err, Some(vec!["password"]));
    }

    #[test]
    fn both_missing_names_both_in_order() {
        let result = Credentials::new("", "").validate();
        let err = result.err().map(|err| err.field_names());
        assert_eq!(err, Some(vec!["username", "password"]));
    }

    #[test]
    fn request_keeps_raw_values() -> Result<(), serde_json::Error> {
        let credentials = Credentials::new(" staff01 ", "s3cret ");
        let body = serde_json::to_value(LoginRequest::from(&credentials))?;
        assert_eq!(
            body,
            serde_json::json!({"username": " staff01 ", "password": "s3cret "})
        );
        Ok(())
    }
}
