//! The Valentine client: account operations and profile lookup.
//!
//! Every request goes through one [`Authorizer`], so the bearer header
//! and the 401 handling apply uniformly. Account operations translate
//! backend rejections into [`AccountError`]; everything else surfaces as
//! [`ValentineError`].

use std::path::Path;
use std::sync::Arc;

use valentine_protocol::{Account, LoginForm, Profile, SignupRequest, TokenResponse, Validate};
use valentine_session::{Authorizer, Credential, FileStorage, SessionError, SessionStore};
use valentine_transport::{HttpTransport, Request, Transport, TransportError};

use crate::{AccountError, Celebration, ClientConfig, ValentineError};

/// Talks to the Valentine backend on behalf of one session.
///
/// # Example
///
/// ```rust,no_run
/// use valentine::prelude::*;
///
/// # async fn run() -> Result<(), ValentineError> {
/// let client = Client::open(&ClientConfig::from_env(), "credentials.json")?;
///
/// client.authenticate("alice", "hunter2").await?;
/// let me = client.current_user().await?;
/// println!("logged in as {}", me.username);
/// # Ok(())
/// # }
/// ```
pub struct Client<T = HttpTransport> {
    http: Authorizer<T>,
}

impl Client<HttpTransport> {
    /// Builds an HTTP client for `config`, sharing `session`.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ValentineError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(TransportError::Client)?;
        let transport = HttpTransport::with_client(http, &config.base_url);
        Ok(Self::with_transport(transport, session))
    }

    /// Builds an HTTP client whose session is persisted in the JSON file
    /// at `credentials`. A credential saved by an earlier run is picked
    /// up immediately.
    pub fn open(config: &ClientConfig, credentials: impl AsRef<Path>) -> Result<Self, ValentineError> {
        let session = SessionStore::open(FileStorage::new(credentials.as_ref()))?;
        Self::new(config, Arc::new(session))
    }
}

impl<T: Transport> Client<T> {
    /// Builds a client over any transport.
    pub fn with_transport(transport: T, session: Arc<SessionStore>) -> Self {
        Self {
            http: Authorizer::new(transport, session),
        }
    }

    /// The session this client reads and updates.
    pub fn session(&self) -> &Arc<SessionStore> {
        self.http.session()
    }

    // -----------------------------------------------------------------------
    // Account operations
    // -----------------------------------------------------------------------

    /// Creates an account. Does not log in.
    ///
    /// # Errors
    /// - [`AccountError::Validation`] if a field is blank; nothing is sent
    /// - [`AccountError::SignupFailed`] if the backend refuses (4xx)
    /// - [`AccountError::Transport`] for network errors, 5xx, or an
    ///   unreadable reply
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Account, AccountError> {
        let request = SignupRequest::new(username, password, display_name);
        request.validate()?;

        let response = self
            .http
            .send(Request::post_json("/signup", &request)?)
            .await
            .map_err(|e| rejection(e, AccountError::SignupFailed))?;

        let account: Account = response.json()?;
        tracing::info!(username = %account.username, id = %account.id, "account created");
        Ok(account)
    }

    /// Exchanges a username and password for a credential and stores it
    /// in the session. Observers see the session become active.
    ///
    /// # Errors
    /// - [`AccountError::Validation`] if a field is blank; nothing is sent
    /// - [`AccountError::InvalidCredentials`] if the backend refuses
    ///   (4xx); the session is not given a credential
    /// - [`AccountError::Transport`] for network errors, 5xx, or an
    ///   unreadable reply
    /// - [`AccountError::Session`] if the credential can't be persisted
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Credential, AccountError> {
        let form = LoginForm::new(username, password);
        form.validate()?;

        let response = self
            .http
            .send(Request::post_form("/token", form.to_pairs()))
            .await
            .map_err(|e| rejection(e, AccountError::InvalidCredentials))?;

        let token: TokenResponse = response.json()?;
        let credential = Credential::new(token.access_token)?;
        self.store_credential(credential.clone()).await?;

        tracing::info!(username = %form.username, "logged in");
        Ok(credential)
    }

    /// Hands the credential to the session on the blocking pool, since
    /// persisting it writes the credential file.
    async fn store_credential(&self, credential: Credential) -> Result<(), SessionError> {
        let session = Arc::clone(self.session());
        match tokio::task::spawn_blocking(move || session.set_credential(credential)).await {
            Ok(stored) => stored,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    /// Drops the session's credential. Safe to call when logged out.
    pub fn logout(&self) {
        self.session().clear_credential();
        tracing::info!("logged out");
    }

    /// The account the current credential belongs to.
    ///
    /// A 401 here means the credential went stale; the session has been
    /// cleared by the time this returns (see
    /// [`ValentineError::is_session_lost`]).
    pub async fn current_user(&self) -> Result<Profile, ValentineError> {
        let response = self.http.send(Request::get("/users/me")).await?;
        Ok(response.json()?)
    }

    // -----------------------------------------------------------------------
    // Profiles
    // -----------------------------------------------------------------------

    /// Fetches the public profile for `username`.
    pub async fn fetch_profile(&self, username: &str) -> Result<Profile, ValentineError> {
        let path = format!("/user/{}", urlencoding::encode(username));
        let response = self.http.send(Request::get(path)).await?;
        Ok(response.json()?)
    }

    /// Like [`fetch_profile`](Self::fetch_profile), but a failure is
    /// logged and reported as `None`.
    pub async fn load_profile(&self, username: &str) -> Option<Profile> {
        match self.fetch_profile(username).await {
            Ok(profile) => Some(profile),
            Err(error) => {
                tracing::warn!(%username, %error, "could not load profile");
                None
            }
        }
    }

    /// Gathers what the celebration view shows for `username`.
    pub async fn celebrate(&self, username: &str) -> Celebration {
        let profile = self.load_profile(username).await;
        Celebration::new(username, profile)
    }
}

/// Maps a client-side (4xx) rejection to `rejected`, leaving everything
/// else as a transport error.
fn rejection(
    error: TransportError,
    rejected: fn(TransportError) -> AccountError,
) -> AccountError {
    match error.status() {
        Some(status) if status.is_client_error() => {
            tracing::warn!(%status, "backend rejected account request");
            rejected(error)
        }
        _ => AccountError::Transport(error),
    }
}
