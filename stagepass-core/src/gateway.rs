use std::sync::Arc;
use tokio::sync::watch;

use crate::identity::{
    AuthenticatedSession, IdentityError, IdentityProvider, SessionState, UserProfile,
};

/// What the caller is told when signup or login does not produce a session.
///
/// Only the duplicate-email case keeps its identity; every other provider
/// failure collapses into a generic variant so the surface never echoes
/// provider internals back to the customer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("This email is already registered")]
    EmailInUse,

    #[error("Failed to create an account. Please try again.")]
    SignupFailed,

    #[error("Invalid email or password")]
    LoginFailed,
}

/// Why a guarded request cannot be served with a signed-in user.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizeError {
    /// The initial session restore has not finished. Neither a grant nor a
    /// denial; callers present a neutral waiting state.
    #[error("Session is still resolving")]
    SessionPending,

    #[error("Not signed in")]
    NotSignedIn,
}

/// Front door to the identity provider.
///
/// Owns the live [`SessionState`] and is the only writer to it. Consumers
/// either read the current value or subscribe for changes.
pub struct IdentityGateway {
    provider: Arc<dyn IdentityProvider>,
    state_tx: watch::Sender<SessionState>,
}

impl IdentityGateway {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Unresolved);
        Self { provider, state_tx }
    }

    /// One-time initial resolution of the session.
    ///
    /// Moves the state out of `Unresolved` exactly once. A restore failure
    /// resolves to signed-out rather than leaving consumers waiting forever.
    pub async fn resolve(&self) {
        let next = match self.provider.resolve_session().await {
            Ok(Some(session)) => SessionState::SignedIn(session),
            Ok(None) => SessionState::SignedOut,
            Err(e) => {
                tracing::warn!("Session restore failed, starting signed out: {}", e);
                SessionState::SignedOut
            }
        };

        let mut applied = false;
        self.state_tx.send_if_modified(|state| {
            if matches!(state, SessionState::Unresolved) {
                *state = next;
                applied = true;
            }
            applied
        });
        if !applied {
            tracing::debug!("Session already resolved, ignoring late resolution");
        }
    }

    /// Register a new account and open its session.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, GatewayError> {
        match self.provider.signup(email, password).await {
            Ok(session) => {
                tracing::info!("Account created for {}", session.user.uid);
                self.state_tx
                    .send_replace(SessionState::SignedIn(session.clone()));
                Ok(session)
            }
            Err(IdentityError::EmailInUse) => Err(GatewayError::EmailInUse),
            Err(e) => {
                tracing::error!("Signup rejected by identity provider: {}", e);
                Err(GatewayError::SignupFailed)
            }
        }
    }

    /// Open a session for an existing account.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, GatewayError> {
        match self.provider.login(email, password).await {
            Ok(session) => {
                tracing::info!("Signed in {}", session.user.uid);
                self.state_tx
                    .send_replace(SessionState::SignedIn(session.clone()));
                Ok(session)
            }
            Err(e) => {
                // One opaque message for every cause; the log keeps the detail
                tracing::warn!("Login rejected: {}", e);
                Err(GatewayError::LoginFailed)
            }
        }
    }

    /// End the current session.
    ///
    /// Revocation is best-effort; the local state goes to signed-out whether or
    /// not the provider acknowledged it.
    pub async fn logout(&self) {
        let current = self.state_tx.borrow().clone();
        if let SessionState::SignedIn(session) = current {
            if let Err(e) = self.provider.revoke(&session.token).await {
                tracing::warn!("Token revocation failed: {}", e);
            }
            tracing::info!("Signed out {}", session.user.uid);
        }
        self.state_tx.send_replace(SessionState::SignedOut);
    }

    /// Entry point for route guards: map the presented bearer token to a
    /// verified profile, or say why that is not possible right now.
    pub async fn authorize(&self, bearer: Option<&str>) -> Result<UserProfile, AuthorizeError> {
        let current = self.state_tx.borrow().clone();
        match current {
            SessionState::Unresolved => Err(AuthorizeError::SessionPending),
            SessionState::SignedOut => Err(AuthorizeError::NotSignedIn),
            SessionState::SignedIn(session) => {
                let token = bearer.ok_or(AuthorizeError::NotSignedIn)?;
                if token != session.token {
                    return Err(AuthorizeError::NotSignedIn);
                }
                self.provider.verify(token).await.map_err(|e| {
                    tracing::warn!("Bearer token rejected: {}", e);
                    AuthorizeError::NotSignedIn
                })
            }
        }
    }

    /// The session as of this instant.
    pub fn current(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Live feed of session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }
}
