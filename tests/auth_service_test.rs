//! Auth service tests against mocked repositories and session stores.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use storefront_api::domain::{
    AuthStatus, LogoutOutcome, Password, Session, SessionId, Unauthenticated, User,
};
use storefront_api::errors::AppError;
use storefront_api::infra::{MockSessionStore, MockUserRepository};
use storefront_api::services::{AuthService, Authenticator, SignupInput};

fn create_test_user(password: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password_hash: Password::new(password).unwrap().into_string(),
        contact_no: None,
        is_admin: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn signup_input(password: &str) -> SignupInput {
    SignupInput {
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password: password.to_string(),
        contact_no: Some("555-0100".to_string()),
        is_admin: false,
    }
}

fn service(users: MockUserRepository, sessions: MockSessionStore) -> Authenticator {
    Authenticator::new(Arc::new(users), Arc::new(sessions), 3600)
}

#[tokio::test]
async fn test_signup_stores_digest_not_plaintext() {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .withf(|new_user| {
            new_user.password_hash != "secret"
                && Password::from_hash(new_user.password_hash.clone()).verify("secret")
        })
        .times(1)
        .returning(|new_user| {
            Ok(User {
                id: Uuid::new_v4(),
                name: new_user.name,
                email: new_user.email,
                password_hash: new_user.password_hash,
                contact_no: new_user.contact_no,
                is_admin: new_user.is_admin,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

    let auth = service(users, MockSessionStore::new());

    assert_ok!(auth.signup(signup_input("secret")).await);
}

#[tokio::test]
async fn test_signup_conflict_propagates() {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .returning(|_| Err(AppError::conflict("User")));

    let auth = service(users, MockSessionStore::new());

    let result = auth.signup(signup_input("secret")).await;
    assert!(matches!(result, Err(AppError::Conflict(ref e)) if e == "User"));
}

#[tokio::test]
async fn test_signup_short_password_never_reaches_repository() {
    let mut users = MockUserRepository::new();
    users.expect_create().never();

    let auth = service(users, MockSessionStore::new());

    let result = auth.signup(signup_input("abc")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_login_saves_session_with_ttl() {
    let user = create_test_user("secret");
    let user_id = user.id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email == "test@example.com")
        .returning(move |_| Ok(Some(user.clone())));

    let mut sessions = MockSessionStore::new();
    sessions
        .expect_save()
        .withf(move |session, ttl| {
            *ttl == 3600
                && session.authenticated
                && session.user.as_ref().map(|u| u.id) == Some(user_id)
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let auth = service(users, sessions);

    let session = assert_ok!(
        auth.login("test@example.com".into(), "secret".into(), None)
            .await
    );
    assert_eq!(session.user.unwrap().id, user_id);
}

#[tokio::test]
async fn test_login_save_failure_is_session_error() {
    let user = create_test_user("secret");

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(user.clone())));

    let mut sessions = MockSessionStore::new();
    sessions
        .expect_save()
        .returning(|_, _| Err(AppError::persistence("connection refused")));

    let auth = service(users, sessions);

    let result = auth
        .login("test@example.com".into(), "secret".into(), None)
        .await;
    let err = assert_err!(result);
    assert!(matches!(err, AppError::SessionPersistence(_)));
    assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_login_ignores_failure_to_drop_previous_session() {
    let user = create_test_user("secret");

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(user.clone())));

    let mut sessions = MockSessionStore::new();
    sessions
        .expect_destroy()
        .times(1)
        .returning(|_| Err(AppError::persistence("timeout")));
    sessions.expect_save().returning(|_, _| Ok(()));

    let auth = service(users, sessions);

    assert_ok!(
        auth.login(
            "test@example.com".into(),
            "secret".into(),
            Some(SessionId::generate()),
        )
        .await
    );
}

#[tokio::test]
async fn test_wrong_password_never_touches_previous_session() {
    let user = create_test_user("secret");

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(user.clone())));

    let mut sessions = MockSessionStore::new();
    sessions.expect_destroy().never();
    sessions.expect_save().never();

    let auth = service(users, sessions);

    let err = assert_err!(
        auth.login(
            "test@example.com".into(),
            "wrong!!".into(),
            Some(SessionId::generate()),
        )
        .await
    );
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_unknown_email_never_touches_previous_session() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let mut sessions = MockSessionStore::new();
    sessions.expect_destroy().never();

    let auth = service(users, sessions);

    assert_err!(
        auth.login(
            "nobody@example.com".into(),
            "secret".into(),
            Some(SessionId::generate()),
        )
        .await
    );
}

#[tokio::test]
async fn test_check_auth_stale_user_destroys_session() {
    let user = create_test_user("secret");
    let session = Session::authenticated(user.session_user(), 3600);
    let session_id = session.id.clone();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(user.id))
        .returning(|_| Ok(None));

    let mut sessions = MockSessionStore::new();
    sessions
        .expect_load()
        .returning(move |_| Ok(Some(session.clone())));
    sessions
        .expect_destroy()
        .withf(move |id| *id == session_id)
        .times(1)
        .returning(|_| Ok(()));

    let auth = service(users, sessions);

    let status = assert_ok!(auth.check_auth(Some(SessionId::generate())).await);
    assert_eq!(
        status,
        AuthStatus::Unauthenticated(Unauthenticated::UserNotFound)
    );
}

#[tokio::test]
async fn test_check_auth_unchanged_user_skips_write_back() {
    let user = create_test_user("secret");
    let session = Session::authenticated(user.session_user(), 3600);

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));

    let mut sessions = MockSessionStore::new();
    sessions
        .expect_load()
        .returning(move |_| Ok(Some(session.clone())));
    sessions.expect_save().never();

    let auth = service(users, sessions);

    let status = assert_ok!(auth.check_auth(Some(SessionId::generate())).await);
    assert!(status.is_authenticated());
}

#[tokio::test]
async fn test_check_admin_fails_closed_on_store_error() {
    let mut sessions = MockSessionStore::new();
    sessions
        .expect_load()
        .returning(|_| Err(AppError::persistence("down")));

    let auth = service(MockUserRepository::new(), sessions);

    assert!(!auth.check_admin(Some(SessionId::generate())).await);
}

#[tokio::test]
async fn test_check_admin_reads_session_only() {
    let mut admin = create_test_user("secret");
    admin.is_admin = true;
    let session = Session::authenticated(admin.session_user(), 3600);

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().never();

    let mut sessions = MockSessionStore::new();
    sessions
        .expect_load()
        .returning(move |_| Ok(Some(session.clone())));

    let auth = service(users, sessions);

    assert!(auth.check_admin(Some(SessionId::generate())).await);
}

#[tokio::test]
async fn test_logout_without_session() {
    let mut sessions = MockSessionStore::new();
    sessions.expect_load().returning(|_| Ok(None));
    sessions.expect_destroy().never();

    let auth = service(MockUserRepository::new(), sessions);

    assert_eq!(
        assert_ok!(auth.logout(None).await),
        LogoutOutcome::AlreadyLoggedOut
    );
    assert_eq!(
        assert_ok!(auth.logout(Some(SessionId::generate())).await),
        LogoutOutcome::AlreadyLoggedOut
    );
}

#[tokio::test]
async fn test_logout_destroy_failure_is_logout_error() {
    let user = create_test_user("secret");
    let session = Session::authenticated(user.session_user(), 3600);

    let mut sessions = MockSessionStore::new();
    sessions
        .expect_load()
        .returning(move |_| Ok(Some(session.clone())));
    sessions
        .expect_destroy()
        .returning(|_| Err(AppError::persistence("down")));

    let auth = service(MockUserRepository::new(), sessions);

    let err = assert_err!(auth.logout(Some(SessionId::generate())).await);
    assert!(matches!(err, AppError::Logout(_)));
}

#[tokio::test]
async fn test_user_info_missing_user_is_not_found() {
    let user = create_test_user("secret");
    let session = Session::authenticated(user.session_user(), 3600);

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let mut sessions = MockSessionStore::new();
    sessions
        .expect_load()
        .returning(move |_| Ok(Some(session.clone())));

    let auth = service(users, sessions);

    let err = assert_err!(auth.user_info(Some(SessionId::generate())).await);
    assert!(matches!(err, AppError::NotFound(ref e) if e == "User"));
}
