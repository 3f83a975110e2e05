//! Session authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::extractors::{removal_cookie, SessionCookie};
use crate::api::AppState;
use crate::domain::{AuthStatus, SessionUser, Unauthenticated};
use crate::errors::AppError;

/// Authenticated user resolved from the session cookie
#[derive(Clone, Debug)]
pub struct CurrentUser(pub SessionUser);

/// Session authentication middleware.
///
/// Resolves the `sessionId` cookie against the user table (the same check
/// as `/check-auth`) and injects the fresh [`CurrentUser`] into the request
/// extensions. Unauthenticated requests get 401; a session whose user is
/// gone is destroyed and its cookie cleared.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    SessionCookie(session_id): SessionCookie,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match state.auth_service.check_auth(session_id).await? {
        AuthStatus::Authenticated(user) => user,
        AuthStatus::Unauthenticated(Unauthenticated::UserNotFound) => {
            return Ok((jar.remove(removal_cookie()), AppError::Unauthorized).into_response());
        }
        AuthStatus::Unauthenticated(Unauthenticated::NoSession) => {
            return Err(AppError::Unauthorized);
        }
    };

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
