//! HTTP transport implementation using `reqwest`.

use crate::{Body, Request, RequestId, Response, Transport, TransportError};

/// Default `User-Agent` sent with every request.
const USER_AGENT: &str = concat!("valentine/", env!("CARGO_PKG_VERSION"));

/// A reqwest-based [`Transport`] bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for the given base URL, e.g.
    /// `http://127.0.0.1:8000`.
    ///
    /// # Errors
    /// Returns [`TransportError::Client`] if the TLS backend can't be
    /// initialized.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wraps an existing reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let id = RequestId::next();
        let Request {
            method,
            path,
            headers,
            body,
        } = request;

        tracing::debug!(%id, %method, %path, "sending request");

        let builder = self.client.request(method, self.url(&path)).headers(headers);
        let builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Form(pairs) => builder.form(&pairs),
        };

        let resp = builder.send().await.map_err(|e| {
            tracing::debug!(%id, error = %e, "request failed without a response");
            TransportError::Network(e)
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(TransportError::Network)?;

        tracing::debug!(%id, status = status.as_u16(), bytes = body.len(), "received response");

        Ok(Response {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
