//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{removal_cookie, session_cookie, SessionCookie, ValidatedJson};
use crate::api::AppState;
use crate::domain::{AuthStatus, LogoutOutcome, SessionUser, Unauthenticated, UserInfo};
use crate::errors::{AppError, AppResult};
use crate::services::SignupInput;
use crate::types::MessageResponse;

/// Signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Display name
    #[serde(alias = "user_name")]
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Email address, unique per user
    #[serde(alias = "user_email")]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "a@x.com")]
    pub email: String,
    #[serde(alias = "user_password")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret", min_length = 6)]
    pub password: String,
    #[serde(default, alias = "user_contact_no")]
    #[validate(length(max = 32, message = "Contact number is too long"))]
    #[schema(example = "555-0100")]
    pub contact_no: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "user_email")]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "a@x.com")]
    pub email: String,
    #[serde(alias = "user_password")]
    #[schema(example = "secret")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Logged in successfully")]
    pub message: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAuthResponse {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAdminResponse {
    pub is_admin: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfoResponse {
    pub success: bool,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_info: Option<SessionUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Credential routes (rate limited)
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Session inspection and logout routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/check-auth", get(check_auth))
        .route("/check-admin", get(check_admin))
        .route("/user-info", get(user_info))
        .route("/current-user", get(current_user))
        .route("/logout", post(logout))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created", body = MessageResponse),
        (status = 400, description = "Validation error or user already exists"),
        (status = 500, description = "Server error")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .signup(SignupInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            contact_no: payload.contact_no,
            is_admin: payload.is_admin,
        })
        .await?;

    Ok(Json(MessageResponse::new("User created successfully")))
}

/// Log in and receive a session cookie
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; sets the sessionId cookie", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Could not save session")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    SessionCookie(previous): SessionCookie,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let session = state
        .auth_service
        .login(payload.email, payload.password, previous)
        .await?;

    let user = session.user.clone().ok_or_else(|| {
        AppError::internal("Login produced a session without a user")
    })?;
    let jar = jar.add(session_cookie(&session.id, state.cookie_secure));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Logged in successfully".to_string(),
            user,
        }),
    ))
}

/// Report whether the session is authenticated
#[utoipa::path(
    get,
    path = "/check-auth",
    tag = "Authentication",
    responses(
        (status = 200, description = "Authenticated", body = CheckAuthResponse),
        (status = 401, description = "Not authenticated", body = CheckAuthResponse),
        (status = 500, description = "Session or user store unavailable", body = CheckAuthResponse)
    )
)]
pub async fn check_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    SessionCookie(session_id): SessionCookie,
) -> Response {
    // Pollers expect this body shape on every outcome, failures included
    let status = match state.auth_service.check_auth(session_id).await {
        Ok(status) => status,
        Err(e) => {
            tracing::error!(error = %e, "Authentication check failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CheckAuthResponse {
                    is_authenticated: false,
                    user: None,
                    message: Some("Server error during authentication check".to_string()),
                }),
            )
                .into_response();
        }
    };

    match status {
        AuthStatus::Authenticated(user) => Json(CheckAuthResponse {
            is_authenticated: true,
            user: Some(user),
            message: None,
        })
        .into_response(),
        AuthStatus::Unauthenticated(reason) => {
            let body = Json(CheckAuthResponse {
                is_authenticated: false,
                user: None,
                message: Some(reason.message().to_string()),
            });
            if reason == Unauthenticated::UserNotFound {
                (StatusCode::UNAUTHORIZED, jar.remove(removal_cookie()), body).into_response()
            } else {
                (StatusCode::UNAUTHORIZED, body).into_response()
            }
        }
    }
}

/// Report whether the session user is an admin
#[utoipa::path(
    get,
    path = "/check-admin",
    tag = "Authentication",
    responses((status = 200, description = "Admin flag", body = CheckAdminResponse))
)]
pub async fn check_admin(
    State(state): State<AppState>,
    SessionCookie(session_id): SessionCookie,
) -> Json<CheckAdminResponse> {
    let is_admin = state.auth_service.check_admin(session_id).await;
    Json(CheckAdminResponse { is_admin })
}

/// Profile of the logged-in user
#[utoipa::path(
    get,
    path = "/user-info",
    tag = "Authentication",
    responses(
        (status = 200, description = "User profile", body = UserInfoResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_info(
    State(state): State<AppState>,
    SessionCookie(session_id): SessionCookie,
) -> AppResult<Json<UserInfoResponse>> {
    let user = state.auth_service.user_info(session_id).await?;
    Ok(Json(UserInfoResponse {
        success: true,
        user,
    }))
}

/// Session user as stored in the session
#[utoipa::path(
    get,
    path = "/current-user",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session user", body = CurrentUserResponse),
        (status = 401, description = "Not authenticated", body = CurrentUserResponse)
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    SessionCookie(session_id): SessionCookie,
) -> AppResult<Response> {
    match state.auth_service.current_user(session_id).await {
        Ok(user) => Ok(Json(CurrentUserResponse {
            success: true,
            user_id: Some(user.id),
            session_info: Some(user),
            message: None,
        })
        .into_response()),
        Err(AppError::Unauthorized) => Ok((
            StatusCode::UNAUTHORIZED,
            Json(CurrentUserResponse {
                success: false,
                user_id: None,
                session_info: None,
                message: Some(AppError::Unauthorized.to_string()),
            }),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// Destroy the session and clear the cookie
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out (idempotent)", body = MessageResponse),
        (status = 500, description = "Could not log out")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    SessionCookie(session_id): SessionCookie,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    let message = match state.auth_service.logout(session_id).await? {
        LogoutOutcome::LoggedOut => "Logged out successfully",
        LogoutOutcome::AlreadyLoggedOut => "Already logged out",
    };

    Ok((jar.remove(removal_cookie()), Json(MessageResponse::new(message))))
}
