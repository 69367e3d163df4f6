//! HTTP plumbing shared by every resource service.
//!
//! All calls go through [`Transport::send`], which returns a tagged result
//! rather than raising: the payload on success, a [`TransportError`] otherwise.
//! [`HttpTransport`] is the `reqwest` implementation; it also owns session
//! expiry handling through [`SessionGuard`].

mod cancel;
mod http;
mod session;
mod token;

pub use cancel::CancelToken;
pub use http::HttpTransport;
pub use session::{is_session_expired, InMemoryNavigator, Navigator, SessionGuard, ROOT_PATH};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use strum_macros::Display;

use crate::error::{ApiResult, TransportError};

/// Message the dashboard shows when the server sends none.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Fetch successful";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One call against the API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    /// Attach the bearer token.
    pub authorized: bool,
    /// Treat a 401 as the end of the admin session.
    pub check_session: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            authorized: false,
            check_session: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn authorized(mut self, authorized: bool) -> Self {
        self.authorized = authorized;
        self
    }

    /// For calls made before a session exists, such as login.
    pub fn without_session_check(mut self) -> Self {
        self.check_session = false;
        self
    }
}

/// Successful response: status, the envelope message and the raw JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub message: Option<String>,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);
        Self { status, message, body }
    }

    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_SUCCESS_MESSAGE)
    }

    /// Decodes the single item found at `data.data`.
    pub fn into_item<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self.body.pointer("/data/data") {
            Some(Value::Null) | None => Err(TransportError::Decode(
                "response has no data.data payload".to_string(),
            )),
            Some(data) => Ok(T::deserialize(data)?),
        }
    }

    /// Decodes the collection found at `data.data`; an absent payload is an empty list.
    pub fn into_list<T: DeserializeOwned>(self) -> ApiResult<Vec<T>> {
        match self.body.pointer("/data/data") {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(data) => Ok(Vec::<T>::deserialize(data)?),
        }
    }

    /// Decodes the whole body, for endpoints that do not use the envelope.
    pub fn into_body<T: DeserializeOwned>(self) -> ApiResult<T> {
        Ok(serde_json::from_value(self.body)?)
    }
}

/// The seam between services and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}
