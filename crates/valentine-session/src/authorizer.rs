//! The request authorizer: the hook every outgoing request goes through.
//!
//! It's a decorator around a [`Transport`]. It is composed once, when the
//! client is built, so no call site can forget it:
//!
//! ```text
//! caller ──→ Authorizer::send ──→ authorize() ──→ inner transport
//!                                                      │
//! caller ←── Err(Status) ←── on_response_failure() ←───┤ non-2xx
//! caller ←── Ok(Response) ←────────────────────────────┘ 2xx
//! ```
//!
//! The authorizer only ever *reads* and *clears* the credential. It never
//! creates or edits one, and it never retries.

use std::sync::Arc;

use valentine_transport::{
    AUTHORIZATION, Request, Response, StatusCode, Transport, TransportError,
};

use crate::SessionStore;

/// Attaches the session's bearer credential to requests and drops the
/// credential when the backend rejects it.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use valentine_session::{Authorizer, MemoryStorage, SessionStore};
/// use valentine_transport::{HttpTransport, Request};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let session = Arc::new(SessionStore::open(MemoryStorage::new())?);
/// let http = HttpTransport::new("http://127.0.0.1:8000")?;
/// let authorizer = Authorizer::new(http, Arc::clone(&session));
///
/// let profile = authorizer.send(Request::get("/users/me")).await?;
/// # let _ = profile;
/// # Ok(())
/// # }
/// ```
pub struct Authorizer<T> {
    inner: T,
    session: Arc<SessionStore>,
}

impl<T: Transport> Authorizer<T> {
    /// Wraps `inner`, reading credentials from `session`.
    pub fn new(inner: T, session: Arc<SessionStore>) -> Self {
        Self { inner, session }
    }

    /// The session store this authorizer reads from.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Adds `Authorization: Bearer <credential>` when a credential is
    /// held; otherwise returns the request exactly as given.
    pub fn authorize(&self, request: Request) -> Request {
        match self.session.get_credential() {
            Some(credential) => {
                request.with_header(AUTHORIZATION, credential.bearer_header())
            }
            None => request,
        }
    }

    /// Reacts to a non-success response and turns it into the error the
    /// caller sees.
    ///
    /// A 401 clears the session. Whatever the status, the returned error
    /// carries the original status and body: the failure is re-signalled,
    /// never swallowed.
    pub fn on_response_failure(&self, response: Response) -> TransportError {
        if response.status == StatusCode::UNAUTHORIZED {
            tracing::warn!("credential rejected by backend, clearing session");
            self.session.clear_credential();
        }
        TransportError::Status {
            status: response.status,
            body: response.text(),
        }
    }

    /// Authorizes `request`, sends it, and checks the status.
    ///
    /// # Errors
    /// - [`TransportError::Status`] for any non-2xx response (after the
    ///   401 handling above)
    /// - network errors from the inner transport, untouched; the session
    ///   is left alone since no response arrived
    pub async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let request = self.authorize(request);
        let response = self.inner.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(self.on_response_failure(response))
        }
    }
}
