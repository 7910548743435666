//! Error types for the Valentine client.

use valentine_protocol::ProtocolError;
use valentine_session::SessionError;
use valentine_transport::TransportError;

/// Errors from [`Client::register`](crate::Client::register) and
/// [`Client::authenticate`](crate::Client::authenticate).
///
/// The `Display` text of the two rejection variants is deliberately
/// generic so it can be shown to users as-is: a failed login never says
/// whether the username exists.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// A required field was blank. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] ProtocolError),

    /// The backend rejected the username/password pair.
    #[error("invalid username or password")]
    InvalidCredentials(#[source] TransportError),

    /// The backend refused the signup, e.g. the username is taken.
    #[error("signup failed, please try a different username")]
    SignupFailed(#[source] TransportError),

    /// No usable answer from the backend (network, 5xx, bad body).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The returned credential couldn't be stored.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert sub-crate errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum ValentineError {
    /// A signup or login failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// A request failed (network, non-success status, decoding).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The credential store failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Local validation failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ValentineError {
    /// Returns `true` if the backend rejected the session's credential,
    /// which means the session has already been cleared and the caller
    /// should send the user back to login.
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_unauthorized())
    }
}
