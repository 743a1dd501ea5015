//! Session management

use crate::auth::models::AccountId;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Fixed session lifetime. Sessions are never extended.
pub const SESSION_TTL_SECS: i64 = 30 * 60;

/// Random bytes per token (256 bits)
const TOKEN_BYTES: usize = 32;

/// Session information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque token, hex encoded
    pub token: String,
    /// Account the session belongs to
    pub user_id: AccountId,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Instant from which the session is no longer valid
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn new(token: String, user_id: AccountId, now: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            expires_at: now + session_ttl(),
        }
    }

    /// Check if session is expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub fn session_ttl() -> Duration {
    Duration::seconds(SESSION_TTL_SECS)
}

/// Generate a 256-bit token from the thread-local CSPRNG
pub fn generate_token() -> String {
    hex::encode(rand::random::<[u8; TOKEN_BYTES]>())
}

/// In-memory session registry keyed by token
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Mint a session for `user_id` and return its token
    pub async fn create(&self, user_id: AccountId) -> String {
        self.create_at(user_id, Utc::now()).await
    }

    pub async fn create_at(&self, user_id: AccountId, now: DateTime<Utc>) -> String {
        let session = Session::new(generate_token(), user_id, now);
        let token = session.token.clone();
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Look up a live session. An expired entry is removed and reported absent.
    pub async fn resolve(&self, token: &str) -> Option<Session> {
        self.resolve_at(token, Utc::now()).await
    }

    pub async fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if !session.is_expired_at(now) => return Some(session.clone()),
                Some(_) => {}
            }
        }

        // Re-check under the write lock; another request may have removed it.
        let mut sessions = self.sessions.write().await;
        if sessions.get(token).is_some_and(|s| s.is_expired_at(now)) {
            if let Some(expired) = sessions.remove(token) {
                tracing::debug!(user_id = expired.user_id, "Session expired");
            }
        }
        None
    }

    /// Remove a session. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Drop every expired session
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now()).await
    }

    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    /// Number of stored sessions, expired ones included until they are touched
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionRegistry {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}
