//! Client configuration.

use std::path::PathBuf;

/// Environment variable overriding [`ClientConfig::base_url`].
pub const API_URL_ENV: &str = "VALENTINE_API_URL";

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash.
    ///
    /// Default: `http://127.0.0.1:8000`.
    pub base_url: String,

    /// `User-Agent` sent with every request.
    ///
    /// Default: `valentine/<crate version>`.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            user_agent: concat!("valentine/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// A config pointing at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults, with `VALENTINE_API_URL` applied if set and non-empty.
    pub fn from_env() -> Self {
        Self::from_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn from_api_url(url: Option<String>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Self::default(),
        }
    }
}

/// The default credential file: `$HOME/.valentine/credentials.json`,
/// or `.valentine/credentials.json` under the working directory when no
/// home directory is known.
pub fn default_credentials_path() -> PathBuf {
    let base = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_default();
    base.join(".valentine").join("credentials.json")
}
