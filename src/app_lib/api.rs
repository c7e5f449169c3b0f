//! HTTP helpers for the console API with consistent timeouts and error handling.
//! Feature clients use these helpers to avoid duplicating request setup and to
//! enforce a predictable timeout policy. The helpers do not store secrets or
//! tokens; they only attach the bearer token handed in by the caller.

use super::{config::AppConfig, errors::AppError};
use reqwest::{multipart::Form, Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info_span, Instrument};

/// Default request timeout applied to all HTTP helpers.
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Shared client bound to one API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    config: AppConfig,
}

impl ApiClient {
    /// # Errors
    /// Returns `AppError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        Ok(Self {
            http: build_client()?,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Builds a URL from the configured API base URL and the provided path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        build_url_with_base(&self.config.api_base_url, path)
    }

    /// Builds a media URL by appending `path` verbatim to the report base.
    #[must_use]
    pub fn report_url(&self, path: &str) -> String {
        format!("{}{}", self.config.report_base(), path.trim())
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or an undecodable body.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&SecretString>,
    ) -> Result<T, AppError> {
        let url = self.url(path);
        let payload = serde_json::to_vec(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;

        let span = info_span!("api.post_json", http.method = "POST", url = %url);
        let request = with_bearer(
            self.http
                .post(&url)
                .header("Content-Type", "application/json")
                .body(payload),
            bearer,
        );
        let response = send(request).instrument(span).await?;

        handle_json_response(response).await
    }

    /// Posts a multipart form and parses a JSON response.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or an undecodable body.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        bearer: Option<&SecretString>,
    ) -> Result<T, AppError> {
        let url = self.url(path);
        let span = info_span!("api.post_multipart", http.method = "POST", url = %url);
        let response = send(with_bearer(self.http.post(&url).multipart(form), bearer))
            .instrument(span)
            .await?;

        handle_json_response(response).await
    }

    /// Fetches JSON from a path under the API base.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or an undecodable body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&SecretString>,
    ) -> Result<T, AppError> {
        let url = self.url(path);
        let span = info_span!("api.get_json", http.method = "GET", url = %url);
        let response = send(with_bearer(self.http.get(&url), bearer))
            .instrument(span)
            .await?;

        handle_json_response(response).await
    }

    /// Fetches a binary body from an absolute URL. Only HTTP 200 counts as success.
    ///
    /// # Errors
    /// Returns an error on transport failure or any status other than 200.
    pub async fn get_bytes(
        &self,
        url: &str,
        bearer: Option<&SecretString>,
    ) -> Result<Blob, AppError> {
        let span = info_span!("api.get_bytes", http.method = "GET", url = %url);
        let response = send(with_bearer(self.http.get(url), bearer))
            .instrument(span)
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(status, &body));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|err| AppError::Network(format!("Failed to read response body: {err}")))?;

        debug!(size = bytes.len(), "received binary body");

        Ok(Blob {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Binary response body with its declared content type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> Result<Client, AppError> {
    Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))
}

#[cfg(target_arch = "wasm32")]
fn build_client() -> Result<Client, AppError> {
    Client::builder()
        .build()
        .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))
}

fn with_bearer(builder: RequestBuilder, bearer: Option<&SecretString>) -> RequestBuilder {
    match bearer {
        Some(token) if !token.expose_secret().trim().is_empty() => {
            builder.bearer_auth(token.expose_secret())
        }
        _ => builder,
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, AppError> {
    builder.send().await.map_err(map_request_error)
}

/// Builds a URL from an explicit base URL and the provided path.
pub(crate) fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps reqwest errors into user-facing `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        AppError::Serialization(format!("Failed to build request: {err}"))
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(http_error(status.as_u16(), &body))
    }
}

/// Builds an HTTP error, reading the server's `message` before the body is
/// truncated for display.
fn http_error(status: u16, body: &str) -> AppError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(ToString::to_string)
        });
    AppError::Http {
        status,
        message: sanitize_body(body),
        detail,
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
pub(crate) fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::{json, Value};
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn build_url_with_base_joins_slashes() {
        assert_eq!(
            build_url_with_base("http://127.0.0.1:8000/api/", "/RegisterEmployee/Login/"),
            "http://127.0.0.1:8000/api/RegisterEmployee/Login/"
        );
        assert_eq!(
            build_url_with_base("http://127.0.0.1:8000/api", "reportcard/x/"),
            "http://127.0.0.1:8000/api/reportcard/x/"
        );
        assert_eq!(build_url_with_base("  ", "/login"), "/login");
    }

    #[test]
    fn report_url_appends_path_verbatim() -> Result<()> {
        let client = ApiClient::new(AppConfig::new("http://127.0.0.1:8000/api/"))?;
        assert_eq!(
            client.report_url("/media/reports/card_12.pdf"),
            "http://127.0.0.1:8000/media/reports/card_12.pdf"
        );
        Ok(())
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body("  nope \n"), "nope");
        let long = "x".repeat(500);
        assert_eq!(sanitize_body(&long).chars().count(), MAX_ERROR_CHARS);
    }

    #[tokio::test]
    async fn post_json_sends_body_and_bearer() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/echo/"))
            .and(header("Authorization", "Bearer tab-token"))
            .and(body_json(json!({"name": "value"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(AppConfig::new(format!("{}/api/", server.uri())))?;
        let token = SecretString::from("tab-token".to_string());
        let response: Value = client
            .post_json("echo/", &json!({"name": "value"}), Some(&token))
            .await?;

        assert_eq!(response, json!({"ok": true}));
        Ok(())
    }

    #[tokio::test]
    async fn get_json_maps_http_errors() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/missing/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("  not here  "))
            .mount(&server)
            .await;

        let client = ApiClient::new(AppConfig::new(format!("{}/api/", server.uri())))?;
        let result = client.get_json::<Value>("missing/", None).await;

        assert_eq!(
            result.err(),
            Some(AppError::Http {
                status: 404,
                message: "not here".to_string(),
                detail: None,
            })
        );
        Ok(())
    }

    #[test]
    fn http_error_keeps_message_of_long_json_body() -> Result<()> {
        let body = json!({
            "message": "Old password is incorrect",
            "errors": {"detail": "x".repeat(300)}
        })
        .to_string();

        let AppError::Http {
            status,
            message,
            detail,
        } = http_error(400, &body)
        else {
            return Err(anyhow::anyhow!("expected an HTTP error"));
        };
        assert_eq!(status, 400);
        assert_eq!(message.chars().count(), MAX_ERROR_CHARS);
        assert_eq!(detail.as_deref(), Some("Old password is incorrect"));
        Ok(())
    }

    #[tokio::test]
    async fn get_bytes_rejects_non_200_success() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/media/empty.pdf"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ApiClient::new(AppConfig::new(format!("{}/api/", server.uri())))?;
        let result = client
            .get_bytes(&client.report_url("/media/empty.pdf"), None)
            .await;

        assert_eq!(result.err().and_then(|err| err.status()), Some(204));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() -> Result<()> {
        let client = ApiClient::new(AppConfig::new("http://127.0.0.1:9/api/"))?;
        let result = client.get_json::<Value>("anything/", None).await;

        assert!(matches!(
            result,
            Err(AppError::Network(_) | AppError::Timeout(_))
        ));
        Ok(())
    }
}
