//! Session records and the auth-status values derived from them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::SessionUser;

/// Upper bound on a session lifetime (one year).
const MAX_TTL_SECONDS: u64 = 365 * 24 * 3600;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Issue a new random identifier.
    pub fn generate() -> Self {
        Self(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    /// Wrap a client-supplied value. Empty or oversized values are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > 128 {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-side session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user: Option<SessionUser>,
    pub authenticated: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Fresh authenticated session for `user` living `ttl_seconds`.
    pub fn authenticated(user: SessionUser, ttl_seconds: u64) -> Self {
        let now = Utc::now();
        let ttl = i64::try_from(ttl_seconds.min(MAX_TTL_SECONDS)).unwrap_or(0);
        Self {
            id: SessionId::generate(),
            user: Some(user),
            authenticated: true,
            created_at: now,
            expires_at: now + Duration::seconds(ttl),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Seconds left before expiry, zero once expired.
    pub fn remaining_ttl(&self) -> u64 {
        let remaining = (self.expires_at - Utc::now()).num_seconds();
        u64::try_from(remaining).unwrap_or(0)
    }

    /// User of an authenticated session.
    pub fn principal(&self) -> Option<&SessionUser> {
        if self.authenticated {
            self.user.as_ref()
        } else {
            None
        }
    }
}

/// Why a session did not authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unauthenticated {
    /// No cookie, no stored session, or a session without a user.
    NoSession,
    /// The session pointed at a user that no longer exists; it was destroyed.
    UserNotFound,
}

impl Unauthenticated {
    pub fn message(self) -> &'static str {
        match self {
            Unauthenticated::NoSession => "No active session found",
            Unauthenticated::UserNotFound => "User not found",
        }
    }
}

/// Result of an auth-status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated(SessionUser),
    Unauthenticated(Unauthenticated),
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated(_))
    }
}

/// Result of a logout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    LoggedOut,
    AlreadyLoggedOut,
}
