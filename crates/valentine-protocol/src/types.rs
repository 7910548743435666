//! Request and response bodies for the Valentine backend.
//!
//! Every type here is something that gets serialized to JSON or a form
//! body, sent over HTTP, and deserialized on the other side. Field names
//! match the backend exactly (`display_name`, `access_token`, ...), so no
//! serde renames are needed.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The backend's numeric identifier for a user.
///
/// A newtype wrapper around `i64` (the backend uses an integer primary
/// key). `#[serde(transparent)]` keeps it a bare number on the wire:
/// `UserId(7)` serializes as `7`, not `{ "0": 7 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// Body of `POST /signup`.
///
/// The password is write-only: it goes out in this request and is never
/// read back from the backend. `Debug` is implemented by hand so the
/// password can't leak into logs via `{:?}`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

impl SignupRequest {
    /// Builds a signup body from borrowed strings.
    pub fn new(username: &str, password: &str, display_name: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// The account echoed back by a successful signup.
///
/// Lifecycle is owned by the backend; the client only displays it and
/// never caches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Body of `POST /token`, sent form-encoded (`username=..&password=..`).
///
/// This is the standard OAuth2 password-grant form the backend expects.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Builds a login form from borrowed strings.
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Returns the form as ordered key/value pairs, ready for
    /// `application/x-www-form-urlencoded` encoding.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), self.username.clone()),
            ("password".to_string(), self.password.clone()),
        ]
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful response of `POST /token`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The bearer credential. Opaque to the client.
    pub access_token: String,
    /// Always `"bearer"` for this backend, but kept for completeness.
    pub token_type: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A read-only display profile, from `GET /user/{username}` or
/// `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    /// The backend allows accounts without a display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Profile {
    /// The name to greet this user with: the display name when it is set
    /// and non-blank, otherwise the username.
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
