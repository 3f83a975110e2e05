//! Session cookie extraction and construction.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;

use crate::config::SESSION_COOKIE_NAME;
use crate::domain::SessionId;

/// Session id presented by the client, if any.
///
/// A missing or malformed cookie yields `SessionCookie(None)`; it never
/// rejects the request.
#[derive(Debug, Clone)]
pub struct SessionCookie(pub Option<SessionId>);

#[async_trait]
impl<S> FromRequestParts<S> for SessionCookie
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state).await?;
        let id = jar
            .get(SESSION_COOKIE_NAME)
            .and_then(|cookie| SessionId::parse(cookie.value()));
        Ok(SessionCookie(id))
    }
}

/// Cookie carrying a freshly issued session id.
pub fn session_cookie(id: &SessionId, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, id.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Cookie that, passed to `CookieJar::remove`, clears the session cookie.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME).path("/").build()
}
