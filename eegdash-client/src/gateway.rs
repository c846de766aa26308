//! Request gateway
//!
//! Every backend call goes through [`Gateway`]. It resolves paths against the
//! configured base URL, attaches the bearer credential, and maps replies onto
//! one error contract:
//!
//! - 401: credential and user state are cleared once, [`ClientEvent::LoginRequired`]
//!   is published, and the call fails with [`ApiError::Unauthorized`]
//! - other non-2xx: the body's `error` field, else `HTTP <status>`
//! - 2xx: the JSON body decoded as-is
//!
//! JSON, multipart and binary-download requests all share this contract.

use crate::error::{ApiError, ApiResult};
use crate::session::SessionState;
use eegdash_common::{ClientEvent, EventBus};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("eegdash/", env!("CARGO_PKG_VERSION"));

/// Per-request options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Applied after the defaults, so they override `Content-Type` and
    /// `Authorization`
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
            query: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(eegdash_common::Error::from)?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, params: Vec<(String, String)>) -> Self {
        self.query = params;
        self
    }
}

/// Shared HTTP gateway
///
/// Cloning is cheap; clones share the connection pool and session state.
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionState>,
    events: EventBus,
}

impl Gateway {
    /// No request timeout is set beyond the transport default
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<SessionState>,
        events: EventBus,
    ) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: eegdash_common::config::normalize_base_url(&base_url.into()),
            session,
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(path, RequestOptions::new(Method::GET)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.request(path, RequestOptions::new(Method::POST).json(body)?)
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.request(path, RequestOptions::new(Method::PUT).json(body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(path, RequestOptions::new(Method::DELETE)).await
    }

    /// Issue a JSON request and decode the reply
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.insert_bearer(&mut headers)?;
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidInput(format!("Invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidInput(format!("Invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        let mut builder = self
            .client
            .request(options.method.clone(), self.url(path))
            .headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(body.to_string());
        }

        let body = self.dispatch(options.method.as_str(), path, builder).await?;
        decode(&body)
    }

    /// Multipart POST; `Content-Type` is left to the form encoder
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<T> {
        let mut headers = HeaderMap::new();
        self.insert_bearer(&mut headers)?;

        let builder = self
            .client
            .post(self.url(path))
            .headers(headers)
            .multipart(form);

        let body = self.dispatch("POST", path, builder).await?;
        decode(&body)
    }

    /// GET returning the raw reply body
    pub async fn download(&self, path: &str) -> ApiResult<Vec<u8>> {
        let mut headers = HeaderMap::new();
        self.insert_bearer(&mut headers)?;

        let builder = self.client.get(self.url(path)).headers(headers);
        self.dispatch("GET", path, builder).await
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Bearer header only when a token is present
    fn insert_bearer(&self, headers: &mut HeaderMap) -> ApiResult<()> {
        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidInput("Stored token is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }

    async fn dispatch(&self, method: &str, path: &str, builder: RequestBuilder) -> ApiResult<Vec<u8>> {
        debug!(method, path, "Sending request");

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(path);
            return Err(ApiError::Unauthorized);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let err = ApiError::from_status(status, &body);
            debug!(method, path, status = status.as_u16(), "Request failed: {}", err);
            return Err(err);
        }

        debug!(method, path, status = status.as_u16(), bytes = body.len(), "Request succeeded");
        Ok(body.to_vec())
    }

    fn handle_unauthorized(&self, path: &str) {
        warn!(path, "Backend rejected credential, clearing session");
        self.session.clear();
        self.events.emit_lossy(ClientEvent::login_required(path));
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Parse(e.to_string()))
}
