//! Password change for signed-in staff. Validation mirrors the form's inline
//! messages; the server's own message is surfaced verbatim on rejection.

pub mod client;
pub mod types;

pub use client::{change_password, PasswordError, CHANGE_FAILED, PASSWORD_CHANGED};
pub use types::{ChangePasswordForm, ChangePasswordRequest};
