//! Authentication service - signup, login, logout and session checks.
//!
//! Sessions live in an injected [`SessionStore`]; user rows come from the
//! [`UserRepository`]. Neither is reached through globals.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    AuthStatus, LogoutOutcome, NewUser, Password, Session, SessionId, SessionUser, Unauthenticated,
    UserInfo,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{SessionStore, UserRepository};

/// Signup data as received from the client (already shape-validated).
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub contact_no: Option<String>,
    pub is_admin: bool,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and return its id
    async fn signup(&self, input: SignupInput) -> AppResult<Uuid>;

    /// Verify credentials and open a fresh session.
    ///
    /// `previous` is the session the client presented, if any. It is
    /// destroyed only once the credentials check out; a rejected attempt
    /// leaves it alone.
    async fn login(
        &self,
        email: String,
        password: String,
        previous: Option<SessionId>,
    ) -> AppResult<Session>;

    /// Resolve the session to a current user projection
    async fn check_auth(&self, session_id: Option<SessionId>) -> AppResult<AuthStatus>;

    /// Whether the session belongs to an admin. Never fails.
    async fn check_admin(&self, session_id: Option<SessionId>) -> bool;

    /// Full profile of the session user
    async fn user_info(&self, session_id: Option<SessionId>) -> AppResult<UserInfo>;

    /// Session user without touching the credential store
    async fn current_user(&self, session_id: Option<SessionId>) -> AppResult<SessionUser>;

    /// Destroy the session. Idempotent.
    async fn logout(&self, session_id: Option<SessionId>) -> AppResult<LogoutOutcome>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    session_ttl: u64,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        session_ttl: u64,
    ) -> Self {
        Self {
            users,
            sessions,
            session_ttl,
        }
    }

    async fn load(&self, session_id: Option<SessionId>) -> AppResult<Option<Session>> {
        match session_id {
            Some(id) => self.sessions.load(&id).await,
            None => Ok(None),
        }
    }

    /// Session user of an authenticated session, `Unauthorized` otherwise.
    async fn principal(&self, session_id: Option<SessionId>) -> AppResult<SessionUser> {
        self.load(session_id)
            .await?
            .and_then(|session| session.principal().cloned())
            .ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn signup(&self, input: SignupInput) -> AppResult<Uuid> {
        let password_hash = Password::new(&input.password)?.into_string();

        // The unique index on users.email decides duplicates
        let user = self
            .users
            .create(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
                contact_no: input.contact_no,
                is_admin: input.is_admin,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user.id)
    }

    async fn login(
        &self,
        email: String,
        password: String,
        previous: Option<SessionId>,
    ) -> AppResult<Session> {
        let user = self.users.find_by_email(&email).await?;

        // Verify against a dummy digest for unknown emails so both
        // failure paths cost the same
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::debug!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        // Only a verified login may replace the presented session
        if let Some(previous) = previous {
            if let Err(e) = self.sessions.destroy(&previous).await {
                tracing::warn!(error = %e, "Failed to destroy previous session");
            }
        }

        let session = Session::authenticated(user.session_user(), self.session_ttl);
        self.sessions
            .save(&session, self.session_ttl)
            .await
            .map_err(|e| AppError::SessionPersistence(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(session)
    }

    async fn check_auth(&self, session_id: Option<SessionId>) -> AppResult<AuthStatus> {
        let Some(mut session) = self.load(session_id).await? else {
            return Ok(AuthStatus::Unauthenticated(Unauthenticated::NoSession));
        };
        let Some(user_id) = session.principal().map(|user| user.id) else {
            return Ok(AuthStatus::Unauthenticated(Unauthenticated::NoSession));
        };

        let Some(user) = self.users.find_by_id(user_id).await? else {
            tracing::info!(user_id = %user_id, "Session references a deleted user");
            if let Err(e) = self.sessions.destroy(&session.id).await {
                tracing::warn!(error = %e, "Failed to destroy stale session");
            }
            return Ok(AuthStatus::Unauthenticated(Unauthenticated::UserNotFound));
        };

        let fresh = user.session_user();
        if session.user.as_ref() != Some(&fresh) {
            let ttl = session.remaining_ttl();
            session.user = Some(fresh.clone());
            if ttl > 0 {
                if let Err(e) = self.sessions.save(&session, ttl).await {
                    tracing::warn!(error = %e, "Failed to refresh session user");
                }
            }
        }

        Ok(AuthStatus::Authenticated(fresh))
    }

    async fn check_admin(&self, session_id: Option<SessionId>) -> bool {
        match self.load(session_id).await {
            Ok(session) => session
                .and_then(|s| s.principal().map(|user| user.is_admin))
                .unwrap_or(false),
            Err(e) => {
                tracing::warn!(error = %e, "Admin check failed, denying");
                false
            }
        }
    }

    async fn user_info(&self, session_id: Option<SessionId>) -> AppResult<UserInfo> {
        let principal = self.principal(session_id).await?;

        let user = self
            .users
            .find_by_id(principal.id)
            .await?
            .ok_or_not_found("User")?;

        Ok(UserInfo::from(user))
    }

    async fn current_user(&self, session_id: Option<SessionId>) -> AppResult<SessionUser> {
        self.principal(session_id).await
    }

    async fn logout(&self, session_id: Option<SessionId>) -> AppResult<LogoutOutcome> {
        let Some(session) = self.load(session_id).await? else {
            return Ok(LogoutOutcome::AlreadyLoggedOut);
        };

        self.sessions
            .destroy(&session.id)
            .await
            .map_err(|e| AppError::Logout(e.to_string()))?;

        tracing::info!(session_id = %session.id, "Session destroyed");
        Ok(LogoutOutcome::LoggedOut)
    }
}
