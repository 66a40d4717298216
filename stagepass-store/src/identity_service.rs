use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use stagepass_core::identity::{
    AuthenticatedSession, IdentityError, IdentityProvider, UserProfile,
};
use stagepass_shared::pii::Masked;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    email: String,
    exp: usize,
}

struct UserRecord {
    uid: Uuid,
    email: String,
    salt: [u8; 16],
    digest: String,
    created_at: DateTime<Utc>,
}

/// Identity provider backed by process-local storage.
///
/// Passwords are kept as salted SHA-256 digests; sessions are HS256 bearer
/// tokens tracked in an active set, so revocation actually invalidates them.
/// Emails are unique case-insensitively.
pub struct LocalIdentityService {
    users: RwLock<HashMap<String, UserRecord>>,
    active_tokens: RwLock<HashSet<String>>,
    secret: String,
    session_ttl_seconds: u64,
}

impl LocalIdentityService {
    pub fn new(secret: &str, session_ttl_seconds: u64) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            active_tokens: RwLock::new(HashSet::new()),
            secret: secret.to_string(),
            session_ttl_seconds,
        }
    }

    fn digest_password(salt: &[u8], password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        BASE64.encode(hasher.finalize())
    }

    fn profile_of(record: &UserRecord) -> UserProfile {
        UserProfile {
            uid: record.uid,
            email: Masked(record.email.clone()),
            created_at: record.created_at,
        }
    }

    fn issue_token(&self, record: &UserRecord) -> Result<String, IdentityError> {
        let claims = SessionClaims {
            sub: record.uid.to_string(),
            email: record.email.clone(),
            exp: (Utc::now() + Duration::seconds(self.session_ttl_seconds as i64)).timestamp()
                as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| IdentityError::Provider(format!("Token encoding failed: {}", e)))
    }

    async fn open_session(&self, record: &UserRecord) -> Result<AuthenticatedSession, IdentityError> {
        let token = self.issue_token(record)?;
        self.active_tokens.write().await.insert(token.clone());
        Ok(AuthenticatedSession {
            user: Self::profile_of(record),
            token,
        })
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityService {
    async fn signup(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, IdentityError> {
        let key = email.to_lowercase();
        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(IdentityError::EmailInUse);
        }

        let mut salt = [0u8; 16];
        OsRng.fill_bytes(&mut salt);
        let record = UserRecord {
            uid: Uuid::new_v4(),
            email: email.to_string(),
            salt,
            digest: Self::digest_password(&salt, password),
            created_at: Utc::now(),
        };
        let session = self.open_session(&record).await?;
        users.insert(key, record);

        tracing::info!("Registered account {}", session.user.uid);
        Ok(session)
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, IdentityError> {
        let users = self.users.read().await;
        // Unknown address and wrong password are indistinguishable on purpose
        let record = users
            .get(&email.to_lowercase())
            .ok_or(IdentityError::InvalidCredentials)?;
        if Self::digest_password(&record.salt, password) != record.digest {
            return Err(IdentityError::InvalidCredentials);
        }
        self.open_session(record).await
    }

    async fn verify(&self, token: &str) -> Result<UserProfile, IdentityError> {
        if !self.active_tokens.read().await.contains(token) {
            return Err(IdentityError::SessionExpired);
        }

        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| IdentityError::SessionExpired)?;

        let users = self.users.read().await;
        let record = users
            .get(&token_data.claims.email.to_lowercase())
            .ok_or(IdentityError::SessionExpired)?;
        Ok(Self::profile_of(record))
    }

    async fn revoke(&self, token: &str) -> Result<(), IdentityError> {
        self.active_tokens.write().await.remove(token);
        Ok(())
    }

    async fn resolve_session(&self) -> Result<Option<AuthenticatedSession>, IdentityError> {
        // Nothing outlives the process; a fresh run starts signed out
        Ok(None)
    }
}
