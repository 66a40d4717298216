use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stagepass_shared::pii::Masked;
use uuid::Uuid;

/// Read-only view of an identity record, as the rest of the engine sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: Uuid,
    pub email: Masked<String>,
    pub created_at: DateTime<Utc>,
}

/// A signed-in user together with the bearer token proving it.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: UserProfile,
    pub token: String,
}

/// The live session signal.
///
/// Starts at `Unresolved` while the provider restores any prior session and
/// never returns there once it has resolved.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Unresolved,
    SignedOut,
    SignedIn(AuthenticatedSession),
}

impl SessionState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Unresolved)
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::SignedIn(session) => Some(&session.user),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Email is already registered")]
    EmailInUse,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session expired or revoked")]
    SessionExpired,

    #[error("Identity provider failure: {0}")]
    Provider(String),
}

/// The external identity service the storefront authenticates against.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and open a session for it.
    async fn signup(&self, email: &str, password: &str)
        -> Result<AuthenticatedSession, IdentityError>;

    /// Open a session for an existing account.
    async fn login(&self, email: &str, password: &str)
        -> Result<AuthenticatedSession, IdentityError>;

    /// Check a bearer token and return the profile it belongs to.
    async fn verify(&self, token: &str) -> Result<UserProfile, IdentityError>;

    /// Invalidate a bearer token.
    async fn revoke(&self, token: &str) -> Result<(), IdentityError>;

    /// Restore whatever session survived from a previous run, if any.
    async fn resolve_session(&self) -> Result<Option<AuthenticatedSession>, IdentityError>;
}
