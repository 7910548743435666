//! The credential type: an opaque bearer token.
//!
//! The client never looks inside the token. It only needs to know two
//! things about it:
//! - that it exists (that's the whole "logged in" state), and
//! - that it can be sent as `Authorization: Bearer <token>`.

use std::fmt;

use valentine_transport::HeaderValue;

use crate::SessionError;

/// An opaque bearer token proving an authenticated session.
///
/// `Debug` is hand-written so the token never shows up in logs, even
/// through `{:?}` on a struct that contains one.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token, checking that it can travel in an HTTP header.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidCredential`] if the token is empty
    /// or contains characters not allowed in a header value.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();
        if token.is_empty() || HeaderValue::from_str(&token).is_err() {
            return Err(SessionError::InvalidCredential);
        }
        Ok(Self(token))
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `Authorization` header value: `Bearer <token>`.
    ///
    /// Marked sensitive so HTTP debug output redacts it.
    pub fn bearer_header(&self) -> HeaderValue {
        // `new` already proved the token is a valid header value, and
        // "Bearer " adds only visible ASCII.
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))
            .unwrap_or_else(|_| HeaderValue::from_static("Bearer"));
        value.set_sensitive(true);
        value
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl PartialEq<&str> for Credential {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
