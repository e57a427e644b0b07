//! Session state shared across the client.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::credentials::CredentialStore;
use crate::user::UserProfile;

/// Authentication state of the client.
///
/// A bearer token exists iff the session is `Authenticated`; the other
/// variants cannot carry one, so the invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    /// Cached credentials have not been consulted yet.
    Verifying,
    /// No valid credential.
    Unauthenticated,
    /// Signed in with a bearer token.
    Authenticated { token: String, user: UserProfile },
}

impl Session {
    /// Returns the bearer token, present only while authenticated.
    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Returns the signed-in user's profile, if any.
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }
}

/// Shared, single-writer handle to the client's session state.
///
/// This is the only piece of cross-component shared mutable state. The
/// writers are the `SessionManager` operations and the request gateway's
/// credential-rejection path (both through [`revoke_credentials`]);
/// everything else takes snapshots.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    /// Creates a handle in the `Verifying` state, the placeholder used
    /// until startup has consulted the credential store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Session::Verifying)),
        }
    }

    /// Returns a copy of the current session state.
    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }

    /// Returns the current bearer token, read live (never a stale copy).
    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token().map(str::to_string)
    }

    /// Returns the signed-in user's profile, if any.
    pub async fn current_user(&self) -> Option<UserProfile> {
        self.inner.read().await.user().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    /// Replaces the session with an authenticated one.
    pub(crate) async fn authenticate(&self, token: String, user: UserProfile) {
        let mut session = self.inner.write().await;
        *session = Session::Authenticated { token, user };
    }

    /// Resolves the session as unauthenticated.
    pub(crate) async fn terminate(&self) {
        let mut session = self.inner.write().await;
        if session.is_authenticated() {
            tracing::info!("[Session] Terminated");
        }
        *session = Session::Unauthenticated;
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the credential store and terminates the session.
///
/// Shared by logout and the gateway's credential-rejection handling so both
/// paths leave identical state behind. Storage failures are logged, not
/// surfaced: from the caller's point of view revocation cannot fail.
pub async fn revoke_credentials(session: &SessionHandle, store: &dyn CredentialStore) {
    if let Err(e) = store.clear() {
        tracing::warn!("[Session] Failed to clear credential store: {}", e);
    }
    session.terminate().await;
}
