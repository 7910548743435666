//! Client session management for Valentine.
//!
//! This crate owns the one piece of client state that outlives a
//! request: the bearer credential.
//!
//! 1. **Storage**: where the credential lives between runs
//!    ([`CredentialStorage`], [`FileStorage`], [`MemoryStorage`])
//! 2. **Session store**: the single credential slot plus login-state
//!    notifications ([`SessionStore`])
//! 3. **Request authorizer**: the decorator every request goes through:
//!    attaches `Authorization: Bearer ...` and clears the store when the
//!    backend answers 401 ([`Authorizer`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Account operations (above)  ← send requests through the Authorizer
//!     ↕
//! Session layer (this crate)  ← credential slot, bearer header, 401 handling
//!     ↕
//! Transport layer (below)     ← sends the HTTP request
//! ```
//!
//! There is no global: one `Arc<SessionStore>` is created at startup and
//! handed to everything that needs it.

mod authorizer;
mod credential;
mod error;
mod storage;
mod store;

pub use authorizer::Authorizer;
pub use credential::Credential;
pub use error::SessionError;
pub use storage::{CREDENTIAL_KEY, CredentialStorage, FileStorage, MemoryStorage};
pub use store::{SessionStore, Subscription};
