//! In-memory admin sessions.
//!
//! A successful login gets an opaque random token. The token maps to the admin's
//! email until it is closed or expires. Sessions do not survive a restart.

use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// How long a session stays valid after login.
pub const SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone)]
struct Session {
    email: String,
    expires_at: DateTime<Utc>,
}

/// Token-to-identity table shared by all requests.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Starts a session for `email` and returns its token.
    pub async fn open(&self, email: &str) -> String {
        self.open_with_ttl(email, Duration::hours(SESSION_TTL_HOURS))
            .await
    }

    async fn open_with_ttl(&self, email: &str, ttl: Duration) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            email: email.to_string(),
            expires_at: Utc::now() + ttl,
        };

        let mut sessions = self.sessions.write().await;
        // Sweep expired entries so the table does not grow without bound
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(token.clone(), session);
        debug!("Opened admin session for {} ({} active)", email, sessions.len());
        token
    }

    /// The email behind `token`, if the session exists and has not expired.
    pub async fn resolve(&self, token: &str) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|s| s.expires_at > Utc::now())
            .map(|s| s.email.clone())
    }

    /// Ends a session. Returns whether it existed.
    pub async fn close(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}
