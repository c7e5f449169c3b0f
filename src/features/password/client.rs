use crate::{
    app_lib::{json::field_text, ApiClient, AppError, ValidationError},
    features::password::types::{ChangePasswordForm, ChangePasswordRequest},
};
use secrecy::SecretString;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const CHANGE_PASSWORD_PATH: &str = "RegisterEmployee/ChangePassword/";
pub const PASSWORD_CHANGED: &str = "Password changed successfully!";
pub const CHANGE_FAILED: &str = "Failed to change password.";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The server answered but did not confirm the change.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(AppError),
}

/// Server message of a JSON body, if it carries a non-empty one.
fn message_of(body: &Value) -> Option<String> {
    let message = field_text(body.get("message"));
    (!message.trim().is_empty()).then_some(message)
}

/// Validates the form locally, then asks the server to change the password.
///
/// # Errors
/// `Validation` before any request; `Rejected` with the server's message (or
/// a generic one) when the change is refused; `Transport` when the server
/// cannot be reached.
#[instrument(skip_all)]
pub async fn change_password(
    client: &ApiClient,
    form: &ChangePasswordForm,
    bearer: Option<&SecretString>,
) -> Result<(), PasswordError> {
    form.validate()?;

    let response = client
        .post_json::<_, Value>(
            CHANGE_PASSWORD_PATH,
            &ChangePasswordRequest::from(form),
            bearer,
        )
        .await;

    let body = match response {
        Ok(body) => body,
        Err(AppError::Parse(_)) => Value::Null,
        Err(AppError::Http { status, detail, .. }) => {
            warn!(status, "password change rejected");
            return Err(PasswordError::Rejected(
                detail.unwrap_or_else(|| CHANGE_FAILED.to_string()),
            ));
        }
        Err(err) => return Err(PasswordError::Transport(err)),
    };

    match message_of(&body) {
        Some(message) if message.to_lowercase() == "success" => {
            info!("password changed");
            Ok(())
        }
        Some(message) => Err(PasswordError::Rejected(message)),
        None => Err(PasswordError::Rejected(CHANGE_FAILED.to_string())),
    }
}
