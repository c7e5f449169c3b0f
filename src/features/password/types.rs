use crate::app_lib::ValidationError;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

pub const USERNAME_REQUIRED: &str = "Username is required.";
pub const OLD_REQUIRED: &str = "Old password is required.";
pub const NEW_REQUIRED: &str = "New password is required.";
pub const CONFIRM_REQUIRED: &str = "Confirm password is required.";
pub const CONFIRM_MISMATCH: &str = "New password and confirm password do not match.";
pub const NEW_SAME_AS_OLD: &str = "New password must be different from old password.";

#[derive(Clone, Debug)]
pub struct ChangePasswordForm {
    pub username: String,
    pub old_password: SecretString,
    pub new_password: SecretString,
    pub confirm_password: SecretString,
}

impl ChangePasswordForm {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        old_password: impl Into<String>,
        new_password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            old_password: SecretString::from(old_password.into()),
            new_password: SecretString::from(new_password.into()),
            confirm_password: SecretString::from(confirm_password.into()),
        }
    }

    /// Required fields are checked after trimming; the comparisons use the
    /// values as typed.
    ///
    /// # Errors
    /// Returns a `ValidationError` naming every failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let old = self.old_password.expose_secret();
        let new = self.new_password.expose_secret();
        let confirm = self.confirm_password.expose_secret();

        let mut errors = ValidationError::new();
        if self.username.trim().is_empty() {
            errors.push("username", USERNAME_REQUIRED);
        }
        if old.trim().is_empty() {
            errors.push("old_password", OLD_REQUIRED);
        }
        if new.trim().is_empty() {
            errors.push("new_password", NEW_REQUIRED);
        }
        if confirm.trim().is_empty() {
            errors.push("confirm_password", CONFIRM_REQUIRED);
        }
        if !new.is_empty() && !confirm.is_empty() && new != confirm {
            errors.push("confirm_password", CONFIRM_MISMATCH);
        }
        if !new.is_empty() && !old.is_empty() && new == old {
            errors.push("new_password", NEW_SAME_AS_OLD);
        }
        errors.into_result()
    }
}

/// Wire body for `RegisterEmployee/ChangePassword/`.
#[derive(Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub username: &'a str,
    pub old_password: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

impl<'a> From<&'a ChangePasswordForm> for ChangePasswordRequest<'a> {
    fn from(form: &'a ChangePasswordForm) -> Self {
        Self {
            username: &form.username,
            old_password: form.old_password.expose_secret(),
            new_password: form.new_password.expose_secret(),
            confirm_password: form.confirm_password.expose_secret(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failures(form: &ChangePasswordForm) -> Vec<(&'static str, String)> {
        form.validate()
            .err()
            .map(|err| {
                err.fields
                    .into_iter()
                    .map(|field| (field.field, field.message))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn all_blank_reports_each_field() {
        let form = ChangePasswordForm::new(" ", "", "", "");
        let names: Vec<_> = failures(&form).into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["username", "old_password", "new_password", "confirm_password"]
        );
    }

    #[test]
    fn mismatch_replaces_confirm_message() {
        let form = ChangePasswordForm::new("staff@school.test", "old", "new-1", "new-2");
        assert_eq!(
            failures(&form),
            vec![("confirm_password", CONFIRM_MISMATCH.to_string())]
        );
    }

    #[test]
    fn reusing_old_password_is_rejected() {
        let form = ChangePasswordForm::new("staff@school.test", "same", "same", "same");
        assert_eq!(
            failures(&form),
            vec![("new_password", NEW_SAME_AS_OLD.to_string())]
        );
    }

    #[test]
    fn valid_form_passes() {
        let form = ChangePasswordForm::new("staff@school.test", "old", "new", "new");
        assert!(form.validate().is_ok());
    }
}
