//! Local "required field" validation.
//!
//! Validation errors never reach the backend: a form that fails
//! [`Validate::validate`] is simply not submitted.

use crate::{LoginForm, ProtocolError, SignupRequest};

/// A request body that can check its own required fields.
pub trait Validate {
    /// Returns the first missing required field, if any.
    ///
    /// # Errors
    /// Returns [`ProtocolError::MissingField`] naming the field.
    fn validate(&self) -> Result<(), ProtocolError>;
}

/// Names and usernames are missing when blank after trimming.
fn require(field: &'static str, value: &str) -> Result<(), ProtocolError> {
    require_present(field, value.trim())
}

/// Passwords are taken as typed; only the empty string is missing.
fn require_present(field: &'static str, value: &str) -> Result<(), ProtocolError> {
    if value.is_empty() {
        return Err(ProtocolError::MissingField(field));
    }
    Ok(())
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ProtocolError> {
        require("username", &self.username)?;
        require_present("password", &self.password)?;
        require("display_name", &self.display_name)
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ProtocolError> {
        require("username", &self.username)?;
        require_present("password", &self.password)
    }
}
