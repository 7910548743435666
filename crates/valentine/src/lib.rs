//! # Valentine
//!
//! Client SDK for the Valentine app.
//!
//! The app is four views (login, signup, the "will you be my valentine?"
//! prompt, and a celebration) over a small HTTP backend. This crate ties
//! the pieces together:
//!
//! - [`Client`]: signup, login, logout, and profile lookup, with every
//!   request passing through the session's authorizer
//! - [`Route`] and [`guard`]: which view a path means, and whether the
//!   session lets you see it
//! - [`flow`]: the three-stage prompt
//! - [`Celebration`]: what the last view shows
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use valentine::prelude::*;
//!
//! # async fn run() -> Result<(), ValentineError> {
//! let client = Client::open(&ClientConfig::default(), "credentials.json")?;
//! client.authenticate("alice", "hunter2").await?;
//!
//! let mut flow = InteractiveFlow::new("bob");
//! flow.on_decline();
//! loop {
//!     match flow.on_affirm() {
//!         Step::Continue(next) => flow = next,
//!         Step::Complete { username } => {
//!             let party = client.celebrate(&username).await;
//!             println!("{}", party.message());
//!             break;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod celebration;
mod client;
mod config;
mod error;
mod route;

pub use celebration::Celebration;
pub use client::Client;
pub use config::{API_URL_ENV, ClientConfig, default_credentials_path};
pub use error::{AccountError, ValentineError};
pub use route::{Route, guard};

pub use valentine_flow as flow;
pub use valentine_protocol as protocol;
pub use valentine_session as session;
pub use valentine_transport as transport;

/// Convenient re-exports for typical usage.
pub mod prelude {
    pub use crate::{
        AccountError, Celebration, Client, ClientConfig, Route, ValentineError, guard,
    };
    pub use valentine_flow::{EvadePosition, InteractiveFlow, Step};
    pub use valentine_protocol::{Account, Profile};
    pub use valentine_session::{
        Credential, FileStorage, MemoryStorage, SessionStore, Subscription,
    };
    pub use valentine_transport::{HttpTransport, Transport};
}
