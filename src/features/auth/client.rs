//! Client wrapper for the login endpoint. The request carries the raw
//! password, so neither the body nor the response is logged.

use crate::{
    app_lib::{ApiClient, AppError},
    features::auth::types::{Credentials, LoginRequest},
};
use serde_json::Value;

pub const LOGIN_PATH: &str = "RegisterEmployee/Login/";

/// Posts the credentials and returns the raw response body. A success body
/// that is not JSON reads as `null`, which resolves to the default role.
///
/// # Errors
/// Returns an error on transport failure or a non-success status.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<Value, AppError> {
    match client
        .post_json::<_, Value>(LOGIN_PATH, &LoginRequest::from(credentials), None)
        .await
    {
        Err(AppError::Parse(_)) => Ok(Value::Null),
        other => other,
    }
}
