use reqwest::StatusCode;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No response arrived (connection refused, DNS, TLS, reset).
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body wasn't the JSON we expected.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body couldn't be serialized.
    #[error("invalid request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The underlying HTTP client couldn't be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    /// The response status, if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for a 401 Unauthorized response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
