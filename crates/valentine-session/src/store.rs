//! The session store: the client's single credential slot.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Holding at most one credential (a new login overwrites the old one)
//! - Persisting it through a [`CredentialStorage`]
//! - Broadcasting the derived "logged in" boolean to observers
//!
//! # Observers
//!
//! There are two ways to watch the login state:
//!
//! - [`SessionStore::subscribe`] registers a callback that runs
//!   synchronously, inside the call that changed the state, in the order
//!   the changes happened. Dropping the returned [`Subscription`]
//!   unregisters it.
//! - [`SessionStore::watch`] hands out a `tokio::sync::watch::Receiver`
//!   for async code that only cares about the latest value.
//!
//! Callbacks run after the store's locks are released, so a callback may
//! call back into the store (e.g. `get_credential`) without deadlocking.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::{Credential, CredentialStorage, SessionError};

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// The single credential slot plus its login-state broadcast.
///
/// ## Lifecycle
///
/// ```text
///            set_credential()            set_credential()
/// [logged out] ─────────────→ [logged in] ─────────────→ [logged in]
///      ↑                           │          (overwrite)
///      └──── clear_credential() ───┘
///            (logout, or a 401 seen by the Authorizer)
/// ```
pub struct SessionStore {
    storage: Box<dyn CredentialStorage>,
    credential: Mutex<Option<Credential>>,
    listeners: Arc<Mutex<Listeners>>,
    state_tx: watch::Sender<bool>,
}

impl SessionStore {
    /// Opens a store over `storage`, loading any credential a previous
    /// run left behind.
    ///
    /// A stored value that isn't a usable bearer token, or a store whose
    /// contents can't be parsed, is discarded with a warning, leaving the
    /// store logged out. The next login overwrites it.
    ///
    /// # Errors
    /// Returns the storage error if the backing store can't be read.
    pub fn open(storage: impl CredentialStorage) -> Result<Self, SessionError> {
        let stored = match storage.load() {
            Ok(stored) => stored,
            Err(e @ SessionError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "ignoring unreadable credential store");
                None
            }
            Err(e) => return Err(e),
        };
        let credential = match stored {
            Some(token) => match Credential::new(token) {
                Ok(credential) => Some(credential),
                Err(_) => {
                    tracing::warn!("discarding unusable stored credential");
                    None
                }
            },
            None => None,
        };

        tracing::debug!(logged_in = credential.is_some(), "session store opened");

        let (state_tx, _) = watch::channel(credential.is_some());
        Ok(Self {
            storage: Box::new(storage),
            credential: Mutex::new(credential),
            listeners: Arc::new(Mutex::new(Listeners::default())),
            state_tx,
        })
    }

    /// Stores `credential`, replacing any previous one, and notifies
    /// observers with `true`.
    ///
    /// The credential is persisted first; if that fails nothing changes
    /// and no one is notified.
    ///
    /// # Errors
    /// Returns the storage error if the credential can't be persisted.
    pub fn set_credential(&self, credential: Credential) -> Result<(), SessionError> {
        {
            let mut slot = self.credential.lock();
            self.storage.save(credential.as_str())?;
            *slot = Some(credential);
            self.state_tx.send_replace(true);
        }
        tracing::info!("credential stored");
        self.notify(true);
        Ok(())
    }

    /// Removes the credential and notifies observers with `false`.
    ///
    /// Idempotent: when no credential is held this does nothing at all,
    /// not even a notification. A failure to remove the persisted copy is
    /// logged; the in-memory state is cleared regardless.
    pub fn clear_credential(&self) {
        {
            let mut slot = self.credential.lock();
            if slot.take().is_none() {
                return;
            }
            if let Err(e) = self.storage.remove() {
                tracing::warn!(error = %e, "failed to remove persisted credential");
            }
            self.state_tx.send_replace(false);
        }
        tracing::info!("credential cleared");
        self.notify(false);
    }

    /// Returns a copy of the current credential, if any.
    pub fn get_credential(&self) -> Option<Credential> {
        self.credential.lock().clone()
    }

    /// Returns `true` if a credential is held.
    pub fn is_logged_in(&self) -> bool {
        self.credential.lock().is_some()
    }

    /// Registers a callback for login-state changes.
    ///
    /// The callback is NOT invoked with the current value; call
    /// [`is_logged_in`](Self::is_logged_in) for that. It stays registered
    /// until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the Subscription unregisters the callback"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(callback)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Returns a receiver that always holds the latest login state.
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.state_tx.subscribe()
    }

    fn notify(&self, logged_in: bool) {
        // Snapshot so callbacks run without the listener lock held.
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(logged_in);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

/// Keeps a [`SessionStore::subscribe`] callback registered.
///
/// Dropping it unregisters the callback.
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
