//! Session state machine: anonymous → authenticating → authenticated.

use std::sync::{Arc, Mutex, MutexGuard};

use cinedeck_api::auth::AuthError;
use cinedeck_api::traits::{AuthBackend, AuthResponse, Credentials};
use cinedeck_core::models::{Session, User};
use cinedeck_core::storage::{KeyValueStore, TOKEN_KEY};

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    /// Login/register calls currently awaiting the backend.
    in_flight: usize,
}

/// Owns the [`Session`] and the persisted token.
///
/// Concurrent `login`/`register` calls are allowed to race; whichever
/// response resolves last decides the final state.
pub struct AuthSession<A, S> {
    backend: A,
    store: S,
    state: Arc<Mutex<SessionState>>,
}

impl<A: AuthBackend, S: KeyValueStore> AuthSession<A, S> {
    pub fn new(backend: A, store: S) -> Self {
        Self {
            backend,
            store,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().session.is_authenticated()
    }

    /// The session token, or `NotAuthenticated` for anonymous users.
    pub fn require_authenticated(&self) -> Result<String, AuthError> {
        let state = self.lock();
        match &state.session.token {
            Some(token) if state.session.is_authenticated() => Ok(token.clone()),
            _ => Err(AuthError::NotAuthenticated),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = Credentials::new(email, password);
        self.begin_request();
        let result = self.backend.login(&credentials).await;
        self.complete(email, result).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = Credentials::new(email, password);
        self.begin_request();
        let result = self.backend.register(&credentials).await;
        self.complete(email, result).await
    }

    /// Forget the token locally and on disk. Storage failures are logged only.
    pub async fn logout(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY).await {
            tracing::warn!("Failed to remove stored token: {e}");
        }
        self.lock().session.sign_out();
        tracing::info!("Signed out");
    }

    /// Adopt a previously persisted token without asking the backend whether
    /// it is still valid.
    pub async fn restore_session(&self) -> Session {
        let stored = match self.store.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read stored token: {e}");
                None
            }
        };

        let mut state = self.lock();
        match stored {
            Some(token) => {
                tracing::info!("Restored session from stored token");
                state.session.authenticate(token, None);
            }
            None if state.session.is_authenticated() => {
                tracing::debug!("No stored token; keeping current session");
            }
            None => {
                tracing::debug!("No stored token; staying anonymous");
                state.session.sign_out();
            }
        }
        state.session.clone()
    }

    fn begin_request(&self) {
        let mut state = self.lock();
        state.in_flight += 1;
        state.session.loading = true;
        state.session.last_error = None;
    }

    async fn complete(
        &self,
        email: &str,
        result: Result<AuthResponse, AuthError>,
    ) -> Result<Session, AuthError> {
        if let Ok(resp) = &result {
            // The session is usable even if the token cannot be saved; it just
            // will not survive a restart.
            if let Err(e) = self.store.set(TOKEN_KEY, resp.token.clone()).await {
                tracing::warn!("Failed to persist session token: {e}");
            }
        }

        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.session.loading = state.in_flight > 0;

        match result {
            Ok(resp) => {
                let user = User {
                    email: email.to_owned(),
                    id: resp.id,
                };
                state.session.authenticate(resp.token, Some(user));
                tracing::info!(email, "Signed in");
                Ok(state.session.clone())
            }
            Err(e) => {
                tracing::debug!(email, "Authentication failed: {e}");
                state.session.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
