//! Session lifecycle operations.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::backend::{AuthBackend, AuthSuccess};
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::session::{Session, SessionHandle, revoke_credentials};
use crate::user::UserProfile;
use crate::validate;

/// Owns the session state machine.
///
/// `SessionManager` is the single writer API over [`SessionHandle`]:
/// - reconciling cached credentials against the backend on startup
/// - login and signup (validated locally first)
/// - logout, which cannot fail from the caller's point of view
///
/// The request gateway's credential-rejection side effect goes through the
/// same [`revoke_credentials`] path, so both leave identical state behind.
pub struct SessionManager<A> {
    backend: Arc<A>,
    store: Arc<dyn CredentialStore>,
    session: SessionHandle,
}

impl<A: AuthBackend + 'static> SessionManager<A> {
    pub fn new(backend: Arc<A>, store: Arc<dyn CredentialStore>, session: SessionHandle) -> Self {
        Self {
            backend,
            store,
            session,
        }
    }

    /// The shared session handle this manager writes to.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Reconciles cached credentials against the backend.
    ///
    /// A cached pair authenticates the session immediately so the first
    /// render is not blocked, then verification runs in the background; if
    /// it fails (rejected token or unreachable backend alike), the store is
    /// cleared and the session terminated. Without a cached pair the
    /// session resolves to `Unauthenticated` right away.
    ///
    /// Returns the verification task's handle when one was spawned, so
    /// callers that need to observe resolution can await it. Dropping it is
    /// fine; verification is fire-and-forget.
    pub async fn startup(&self) -> Option<JoinHandle<()>> {
        let pair = match self.store.load() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("[Session] Credential store unreadable at startup: {}", e);
                None
            }
        };

        let Some(pair) = pair else {
            self.session.terminate().await;
            return None;
        };

        tracing::info!("[Session] Restoring cached session for {}", pair.user.email);
        self.session.authenticate(pair.token, pair.user).await;

        let backend = self.backend.clone();
        let store = self.store.clone();
        let session = self.session.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = backend.verify().await {
                tracing::info!("[Session] Cached token failed verification: {}", e);
                revoke_credentials(&session, store.as_ref()).await;
            }
        }))
    }

    /// Signs in. On success the pair is persisted and the session becomes
    /// authenticated; on failure the session state is untouched and the
    /// error carries the reason for inline display.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        validate::login_fields(email, password)?;
        let auth = self.backend.login(email.trim(), password).await?;
        self.persist_and_authenticate(auth).await
    }

    /// Creates an account; success is an immediate login.
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<UserProfile> {
        validate::signup_fields(name, email, password)?;
        let auth = self.backend.signup(email.trim(), password, name.trim()).await?;
        self.persist_and_authenticate(auth).await
    }

    /// Signs out unconditionally, regardless of backend reachability.
    pub async fn logout(&self) {
        revoke_credentials(&self.session, self.store.as_ref()).await;
    }

    async fn persist_and_authenticate(&self, auth: AuthSuccess) -> Result<UserProfile> {
        self.store.save(&auth.token, &auth.user)?;
        self.session.authenticate(auth.token, auth.user.clone()).await;
        Ok(auth.user)
    }

    /// Convenience snapshot of the current session state.
    pub async fn current(&self) -> Session {
        self.session.snapshot().await
    }
}
