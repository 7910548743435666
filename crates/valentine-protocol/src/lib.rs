//! Wire types for the Valentine backend API.
//!
//! This crate defines the "language" the client and the backend speak:
//!
//! - **Types** ([`SignupRequest`], [`LoginForm`], [`TokenResponse`],
//!   [`Account`], [`Profile`]): the bodies that travel over HTTP.
//! - **Validation** ([`Validate`]): the local "required field" checks
//!   that run before anything is sent.
//! - **Errors** ([`ProtocolError`]): what can go wrong before a request
//!   ever leaves the process.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw HTTP) and the
//! account operations. It doesn't know about sessions or credentials
//! storage; it only knows what the payloads look like.
//!
//! ```text
//! Transport (HTTP) → Protocol (typed bodies) → Account operations
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod error;
mod types;
mod validate;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

// Users write `use valentine_protocol::Profile` instead of
// `use valentine_protocol::types::Profile`.

pub use error::ProtocolError;
pub use types::{
    Account, LoginForm, Profile, SignupRequest, TokenResponse, UserId,
};
pub use validate::Validate;
