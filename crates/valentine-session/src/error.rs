//! Error types for the session layer.

use std::path::PathBuf;

/// Errors that can occur while storing or validating a credential.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The token can't be carried in an `Authorization` header
    /// (empty, or containing control characters).
    #[error("credential is not a valid bearer token")]
    InvalidCredential,

    /// Reading or writing the credential file failed.
    #[error("credential storage at {path} failed: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential file exists but isn't the JSON object we write.
    #[error("credential file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
