//! Error types for the protocol layer.
//!
//! Each crate in Valentine defines its own error enum. When you see a
//! `ProtocolError`, you know the problem was caught locally, before any
//! network traffic happened.

/// Errors that can occur in the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// A required form field was empty (or only whitespace).
    ///
    /// The payload names the field so a front end can highlight it,
    /// e.g. `"display_name"`.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
