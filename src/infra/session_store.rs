//! Session storage.
//!
//! The auth service only sees the [`SessionStore`] trait. Two backends:
//! Redis (shared, survives restarts) and an in-process map used for local
//! development and tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::cache::Cache;
use crate::domain::{Session, SessionId};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Keyed session storage with expiry.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a live session. Expired sessions are reported as absent.
    async fn load(&self, id: &SessionId) -> AppResult<Option<Session>>;

    /// Create or overwrite a session, expiring after `ttl_seconds`.
    async fn save(&self, session: &Session, ttl_seconds: u64) -> AppResult<()>;

    /// Remove a session. Removing an absent session is not an error.
    async fn destroy(&self, id: &SessionId) -> AppResult<()>;
}

/// Redis-backed sessions (`session:{id}` keys with SETEX).
pub struct RedisSessionStore {
    cache: Cache,
}

impl RedisSessionStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &SessionId) -> AppResult<Option<Session>> {
        let session: Option<Session> = self.cache.get_session(id.as_str()).await?;
        Ok(session.filter(|s| !s.is_expired()))
    }

    async fn save(&self, session: &Session, ttl_seconds: u64) -> AppResult<()> {
        self.cache
            .set_session(session.id.as_str(), session, ttl_seconds)
            .await
    }

    async fn destroy(&self, id: &SessionId) -> AppResult<()> {
        self.cache.delete_session(id.as_str()).await
    }
}

/// In-process sessions. Lost on restart; not shared between instances.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> AppResult<Option<Session>> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                None => return Ok(None),
                Some(session) if !session.is_expired() => return Ok(Some(session.clone())),
                Some(_) => {}
            }
        }

        // Evict lazily
        let mut sessions = self.sessions.write().await;
        if sessions.get(id).is_some_and(Session::is_expired) {
            sessions.remove(id);
        }
        Ok(None)
    }

    async fn save(&self, session: &Session, ttl_seconds: u64) -> AppResult<()> {
        // Same contract as SETEX: the entry dies after `ttl_seconds` at the latest
        let mut stored = session.clone();
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        if let Some(deadline) = chrono::Duration::try_seconds(ttl).and_then(|d| Utc::now().checked_add_signed(d)) {
            stored.expires_at = stored.expires_at.min(deadline);
        }

        let mut sessions = self.sessions.write().await;
        // Sweep sessions that expired without being loaded again
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> AppResult<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}
