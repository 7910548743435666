//! Transport abstraction layer for Valentine.
//!
//! Provides an owned [`Request`]/[`Response`] model and the [`Transport`]
//! trait that sends one over the network. [`HttpTransport`] is the
//! reqwest-backed implementation. A `Transport` returns `Ok` for any
//! status the server sends; wrappers such as the session crate's request
//! authorizer decide which statuses count as failures.
//!
//! Requests are plain data until they are sent, so a decorator can
//! inspect or extend them and tests can compare them field by field.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransport;
pub use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
pub use reqwest::{Method, StatusCode};

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Counter for generating unique request IDs.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for one request, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Allocates the next process-wide request ID.
    pub fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// An outgoing request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No body (GET requests).
    Empty,
    /// A JSON document.
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` key/value pairs, in order.
    Form(Vec<(String, String)>),
}

/// An outgoing request, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path starting with `/`, e.g. `/user/alice`.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Body,
}

impl Request {
    /// Creates a request with no headers and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a `POST` request with a JSON body.
    ///
    /// # Errors
    /// Returns [`TransportError::Encode`] if `body` can't be represented
    /// as JSON.
    pub fn post_json<T: Serialize>(
        path: impl Into<String>,
        body: &T,
    ) -> Result<Self, TransportError> {
        let value = serde_json::to_value(body).map_err(TransportError::Encode)?;
        let mut request = Self::new(Method::POST, path);
        request.body = Body::Json(value);
        Ok(request)
    }

    /// Creates a `POST` request with a form-encoded body.
    pub fn post_form(
        path: impl Into<String>,
        pairs: Vec<(String, String)>,
    ) -> Self {
        let mut request = Self::new(Method::POST, path);
        request.body = Body::Form(pairs);
        request
    }

    /// Sets a header, replacing any existing value.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    /// Returns [`TransportError::Decode`] on malformed or mismatched JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(TransportError::Decode)
    }
}

/// Sends requests and returns their responses.
///
/// A response with any status is `Ok`; only failures where no response
/// arrived at all are `Err`. Callers decide what a status means.
pub trait Transport: Send + Sync + 'static {
    /// Sends a request and waits for the full response.
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        (**self).send(request)
    }
}
