//! HTTP transport for JSON APIs with a consistent timeout and error policy. Feature
//! clients use it to avoid duplicating request setup. The client holds no per-user
//! state: bearer tokens travel in [`RequestOptions`] for the one call that needs
//! them, never as mutable default headers.

use crate::{APP_USER_AGENT, config::AppConfig, errors::AppError};
use reqwest::{
    Client, RequestBuilder,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;
/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Options that apply to a single request.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    bearer: Option<SecretString>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends `Authorization: Bearer <token>` with this request only.
    #[must_use]
    pub fn bearer(mut self, token: &SecretString) -> Self {
        self.bearer = Some(token.clone());
        self
    }
}

/// Status and raw body of a completed request. Interpreting the status is left
/// to the caller since each endpoint has its own success code.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// True when the body has something other than whitespace.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }

    /// Decodes the body as JSON, or `None` when the body is empty.
    ///
    /// # Errors
    /// Returns `AppError::Parse` if a non-empty body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>, AppError> {
        if !self.has_body() {
            return Ok(None);
        }
        serde_json::from_str(&self.body)
            .map(Some)
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    }

    /// Decodes a body that must be present.
    ///
    /// # Errors
    /// Returns `AppError::UnexpectedStatus` if the body is empty and
    /// `AppError::Parse` if it is not valid JSON for `T`.
    pub fn require_json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        self.json()?
            .ok_or_else(|| AppError::unexpected_status(self.status))
    }

    /// Status error carrying the sanitized response body.
    #[must_use]
    pub fn into_status_error(self) -> AppError {
        AppError::UnexpectedStatus {
            status: self.status,
            message: sanitize_body(&self.body),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Builds the transport from the configured base URL and timeout.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the underlying client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// # Errors
    /// Returns `AppError::Transport` or `AppError::Timeout` if no response arrives.
    pub async fn get(&self, path: &str, options: &RequestOptions) -> Result<ApiResponse, AppError> {
        let url = self.url(path);
        let builder = self.client.get(&url);
        self.send("GET", &url, builder, options).await
    }

    /// # Errors
    /// Returns `AppError::Serialization` if the body cannot be encoded, or
    /// `AppError::Transport`/`AppError::Timeout` if no response arrives.
    pub async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<ApiResponse, AppError> {
        let url = self.url(path);
        let payload = serde_json::to_string(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        let builder = self.client.post(&url).body(payload);
        self.send("POST", &url, builder, options).await
    }

    /// # Errors
    /// Returns `AppError::Transport` or `AppError::Timeout` if no response arrives.
    pub async fn post_empty(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse, AppError> {
        let url = self.url(path);
        let builder = self.client.post(&url);
        self.send("POST", &url, builder, options).await
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    async fn send(
        &self,
        method: &str,
        url: &str,
        builder: RequestBuilder,
        options: &RequestOptions,
    ) -> Result<ApiResponse, AppError> {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = builder.header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = &options.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let span = info_span!(
            "api.request",
            http.method = method,
            url = %url,
            request_id = %request_id
        );

        async move {
            let response = builder.send().await.map_err(map_request_error)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(map_request_error)?;
            debug!(status, "response received");
            Ok(ApiResponse { status, body })
        }
        .instrument(span)
        .await
    }
}

/// Builds a URL from a base URL and a path, tolerating stray slashes.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps network errors into `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Transport(format!("Unable to reach the server: {err}"))
    }
}

/// Trims and truncates HTTP error bodies before they reach the user.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
