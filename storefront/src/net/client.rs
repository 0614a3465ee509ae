//! Authenticated request client.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures surface as [`ApiError::Network`] and non-2xx statuses
//! as [`ApiError::Request`] carrying the server's body text. The client does
//! not retry and does not refresh tokens: a 401 is just another
//! `ApiError::Request`. Callers that fetch session-scoped data treat any
//! failure as an invalid session (see `state::auth::invalidate_on_failure`).
//!
//! Calls are independent. Nothing is coalesced or queued, and two concurrent
//! mutations may land in either order. Dropping a returned future abandons
//! the call.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::StorefrontConfig;
use crate::session::Session;
use crate::storage::{Storage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status. `message` is the response
    /// body, or `request failed with status <code>` when the body was empty;
    /// `from_body` tells the two apart.
    #[error("{message}")]
    Request { status: u16, message: String, from_body: bool },

    /// No response at all (DNS, connect, TLS, aborted body).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx body was not the expected JSON.
    #[error("response decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A header value contained characters HTTP does not allow.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The endpoint answered 2xx with no body where a value was required.
    #[error("empty response from {path}")]
    EmptyResponse { path: String },

    /// The session could not be persisted after a successful call.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// HTTP status for [`ApiError::Request`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body text the backend sent with a rejection, if it sent any.
    #[must_use]
    pub fn server_text(&self) -> Option<&str> {
        match self {
            Self::Request { message, from_body: true, .. } => Some(message),
            _ => None,
        }
    }
}

/// Per-call options for [`ApiClient::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    /// Never attach the stored bearer token.
    pub anonymous: bool,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    #[must_use]
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    #[must_use]
    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    #[must_use]
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Set a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if `body` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Encode)?);
        Ok(self)
    }

    /// Set a header. A caller-set `Authorization` or `Content-Type` wins over
    /// the ones the client would add.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Send without the stored bearer token (login, registration).
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// HTTP client bound to one backend origin and one session.
pub struct ApiClient<S> {
    http: reqwest::Client,
    base_url: String,
    session: Session<S>,
}

impl<S> Clone for ApiClient<S> {
    fn clone(&self) -> Self {
        Self { http: self.http.clone(), base_url: self.base_url.clone(), session: self.session.clone() }
    }
}

impl<S: Storage> ApiClient<S> {
    /// Build a client for `config.api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &StorefrontConfig, session: Session<S>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http(http, &config.api_base_url, session))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: &str, session: Session<S>) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_owned(), session }
    }

    #[must_use]
    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        resolve_url(&self.base_url, path)
    }

    /// Issue a request and return the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when no response arrives, or an encode
    /// or header error before sending.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Response, ApiError> {
        let url = self.resolve(path);
        let RequestOptions { method, body, mut headers, anonymous } = options;

        if !anonymous && !headers.contains_key(AUTHORIZATION) {
            if let Some(token) = self.session.access_token() {
                headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
            }
        }

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            builder = builder.body(serde_json::to_string(&body).map_err(ApiError::Encode)?);
        }

        tracing::debug!(%method, %url, authorized = headers.contains_key(AUTHORIZATION), "api request");
        let response = builder.headers(headers).send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "api request failed before a response");
            ApiError::Network(e)
        })?;
        tracing::debug!(%method, %url, status = response.status().as_u16(), "api response");
        Ok(response)
    }

    /// Issue a request and parse a JSON body.
    ///
    /// A 2xx with status 204 or an empty body yields `Ok(None)` without
    /// parsing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] for non-2xx statuses, [`ApiError::Decode`]
    /// for a body that is not a `T`, and transport errors from
    /// [`Self::request`].
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<T>, ApiError> {
        let response = self.request(path, options).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let text = response.text().await?;
        if text.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text).map(Some).map_err(ApiError::Decode)
    }

    /// Issue a request and return the body as text. For endpoints that answer
    /// with plain strings (`/api/auth/register`).
    ///
    /// # Errors
    ///
    /// Same failure policy as [`Self::request_json`].
    pub async fn request_text(&self, path: &str, options: RequestOptions) -> Result<String, ApiError> {
        let response = self.request(path, options).await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.text().await?)
    }
}

/// Turn a non-2xx response into [`ApiError::Request`]. A failure to read the
/// body is swallowed and treated as an empty body.
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let from_body = !text.is_empty();
    let message = if from_body { text } else { generic_failure(status) };
    tracing::debug!(status, from_body, "api request rejected");
    ApiError::Request { status, message, from_body }
}

fn generic_failure(status: u16) -> String {
    format!("request failed with status {status}")
}

pub(crate) fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;
