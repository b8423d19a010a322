//! Login page handlers.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use super::found;
use crate::application::services::LoginError;
use crate::application::services::login_service::UNEXPECTED_ERROR_MESSAGE;
use crate::domain::credentials::{Credentials, LoginForm};
use crate::domain::entities::SessionUser;
use crate::state::AppState;
use crate::web::flash::FlashState;
use crate::web::session::Session;
use crate::web::templates::LoginTemplate;

/// Where a successful login lands.
pub const POST_LOGIN_PATH: &str = "/dashboard";

/// Renders the login form.
///
/// # Endpoint
///
/// `GET /login`
///
/// Consumes any flash state left by the previous request, so errors and the
/// repopulated email are shown exactly once.
pub async fn login_page_handler(Extension(session): Extension<Session>) -> LoginTemplate {
    LoginTemplate::from(FlashState::take(&session).await)
}

/// Processes a login form submission.
///
/// # Endpoint
///
/// `POST /login` (`application/x-www-form-urlencoded`: `email`, `password`)
///
/// # Responses
///
/// - **302 Found** to [`POST_LOGIN_PATH`]: credentials verified, identity
///   stored, session token rotated
/// - **200 OK**: the form re-rendered with errors; the same errors are kept as
///   flash state for one more render
///
/// Errors from earlier requests are discarded; only this attempt's errors
/// are shown.
pub async fn login_submit_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<LoginForm>,
) -> Response {
    let _ = FlashState::take(&session).await;

    let credentials = Credentials::from(form);

    let errors = match state.login_service.authenticate(&credentials).await {
        Ok(user) => {
            let session_user = SessionUser::from_record(&user);

            match session.sign_in(&session_user).await {
                Ok(()) => {
                    metrics::counter!("login_attempts_total", "outcome" => "success").increment(1);
                    info!(user_id = user.id, "User logged in");
                    return found(POST_LOGIN_PATH);
                }
                Err(e) => {
                    metrics::counter!("login_attempts_total", "outcome" => "error").increment(1);
                    error!(user_id = user.id, error = %e, "Failed to establish session");
                    vec![UNEXPECTED_ERROR_MESSAGE.to_string()]
                }
            }
        }
        Err(err) => {
            metrics::counter!("login_attempts_total", "outcome" => err.kind()).increment(1);
            log_failure(&credentials, &err);
            err.user_messages()
        }
    };

    let flash = FlashState::failure(errors, credentials.email());
    if let Err(e) = flash.save(&session).await {
        warn!(error = %e, "Failed to store flash state");
    }

    LoginTemplate::from(flash).into_response()
}

fn log_failure(credentials: &Credentials, err: &LoginError) {
    match err {
        LoginError::Validation(errors) => {
            info!(?errors, "Login form rejected");
        }
        LoginError::InvalidCredentials => {
            warn!(email = credentials.lookup_email(), "Failed login attempt");
        }
        LoginError::Infrastructure(detail) => {
            error!(email = credentials.lookup_email(), error = %detail, "Login failed on infrastructure error");
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use serde_json::json;

    use crate::domain::entities::UserRecord;
    use crate::domain::repositories::MockUserRepository;
    use crate::error::AppError;
    use crate::infrastructure::session::{
        MockSessionStore, SessionError, SessionStore, SessionToken,
    };
    use crate::utils::password::hash_password;
    use crate::web::test_support::{
        login_form, session_cookie, test_server, test_server_with_store, with_cookie,
    };
    use std::sync::Arc;

    const INVALID: &str = "Invalid email or password.";

    fn student(password: &str) -> UserRecord {
        UserRecord::new(
            1,
            "Test Student".to_string(),
            "student@example.com".to_string(),
            hash_password(password).unwrap(),
        )
    }

    fn repo_with(users: Vec<UserRecord>) -> MockUserRepository {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            Ok(users
                .iter()
                .filter(|u| u.email == email)
                .cloned()
                .collect())
        });
        repo
    }

    #[tokio::test]
    async fn test_get_renders_empty_form() {
        let (server, _store) = test_server(MockUserRepository::new());

        let response = server.get("/login").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("<form id=\"login-form\""));
        assert!(!html.contains("error-display"));
        assert!(session_cookie(&response).is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_rerenders_with_generic_error() {
        let (server, _store) = test_server(repo_with(vec![]));

        let response = server
            .post("/login")
            .form(&login_form("a@b.com", "secret"))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains(INVALID));
        assert!(html.contains("value=\"a@b.com\""));
    }

    #[tokio::test]
    async fn test_wrong_password_matches_unknown_user() {
        let (server, _store) = test_server(repo_with(vec![student("secret")]));

        let wrong_password = server
            .post("/login")
            .form(&login_form("student@example.com", "wrong"))
            .await;
        let unknown_user = server
            .post("/login")
            .form(&login_form("nobody@example.com", "wrong"))
            .await;

        wrong_password.assert_status_ok();
        unknown_user.assert_status_ok();
        assert_eq!(wrong_password.text().matches(INVALID).count(), 1);
        assert_eq!(unknown_user.text().matches(INVALID).count(), 1);
    }

    #[tokio::test]
    async fn test_validation_errors_skip_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(0);
        let (server, _store) = test_server(repo);

        let response = server.post("/login").form(&login_form("", "")).await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Email address is required."));
        assert!(html.contains("Password is required."));
        assert!(!html.contains("Invalid email format."));
    }

    #[tokio::test]
    async fn test_missing_fields_are_validation_errors() {
        let (server, _store) = test_server(MockUserRepository::new());

        let response = server.post("/login").form(&[("email", "x@y.com")]).await;

        response.assert_status_ok();
        assert!(response.text().contains("Password is required."));
    }

    #[tokio::test]
    async fn test_malformed_email() {
        let (server, _store) = test_server(MockUserRepository::new());

        let response = server
            .post("/login")
            .form(&login_form("not-an-email", "secret"))
            .await;

        let html = response.text();
        assert!(html.contains("Invalid email format."));
        assert!(!html.contains("Email address is required."));
    }

    #[tokio::test]
    async fn test_flash_shows_on_next_render_only() {
        let (server, _store) = test_server(repo_with(vec![]));

        let failed = server
            .post("/login")
            .form(&login_form("a@b.com", "secret"))
            .await;
        let cookie = session_cookie(&failed).expect("flash requires a session cookie");

        let next = with_cookie(server.get("/login"), &cookie).await;
        let next_html = next.text();
        assert!(next_html.contains(INVALID));
        assert!(next_html.contains("value=\"a@b.com\""));

        let after = with_cookie(server.get("/login"), &cookie).await;
        let after_html = after.text();
        assert!(!after_html.contains(INVALID));
        assert!(after_html.contains("value=\"\""));
    }

    #[tokio::test]
    async fn test_repeated_failures_do_not_accumulate() {
        let (server, _store) = test_server(repo_with(vec![student("secret")]));

        let first = server
            .post("/login")
            .form(&login_form("student@example.com", "wrong"))
            .await;
        let cookie = session_cookie(&first).unwrap();

        let second = with_cookie(server.post("/login"), &cookie)
            .form(&login_form("student@example.com", "wrong"))
            .await;

        assert_eq!(first.text().matches(INVALID).count(), 1);
        assert_eq!(second.text().matches(INVALID).count(), 1);
    }

    #[tokio::test]
    async fn test_successful_login_redirects_and_rotates_token() {
        let (server, store) = test_server(repo_with(vec![student("secret")]));

        let failed = server
            .post("/login")
            .form(&login_form("student@example.com", "wrong"))
            .await;
        let before = session_cookie(&failed).unwrap();

        let response = with_cookie(server.post("/login"), &before)
            .form(&login_form("student@example.com", "secret"))
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/dashboard"
        );

        let after = session_cookie(&response).expect("rotated token must be sent");
        assert_ne!(before, after);

        let new_token = SessionToken::parse(&after).unwrap();
        let old_token = SessionToken::parse(&before).unwrap();
        assert_eq!(
            store.get(&new_token, "user_id").await.unwrap(),
            Some(json!(1))
        );
        assert_eq!(
            store.get(&new_token, "user_name").await.unwrap(),
            Some(json!("Test Student"))
        );
        assert_eq!(
            store.get(&new_token, "user_email").await.unwrap(),
            Some(json!("student@example.com"))
        );
        assert_eq!(store.get(&old_token, "user_id").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_infrastructure_error_is_generic() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| {
            Err(AppError::internal(
                "password authentication failed for user \"root\"",
            ))
        });
        let (server, _store) = test_server(repo);

        let response = server
            .post("/login")
            .form(&login_form("student@example.com", "secret"))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("An unexpected error occurred."));
        assert!(!html.contains("password authentication failed"));
    }

    #[tokio::test]
    async fn test_session_failure_on_sign_in_is_generic_and_anonymous() {
        let mut sessions = MockSessionStore::new();
        sessions.expect_get().returning(|_, _| Ok(None));
        sessions
            .expect_regenerate()
            .times(1)
            .returning(|_| Err(SessionError::Connection("redis down".to_string())));
        sessions
            .expect_set()
            .withf(|_, key, _| key.to_string() == "login_flash")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let server = test_server_with_store(repo_with(vec![student("secret")]), Arc::new(sessions));

        let response = server
            .post("/login")
            .form(&login_form("student@example.com", "secret"))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("An unexpected error occurred."));
        assert!(!html.contains("redis down"));
        assert!(!html.contains(INVALID));
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_entity_bearing_emails_fail_format_check() {
        for email in ["o'brien@example.com", "a&b@example.com", "x<y@example.com"] {
            let mut repo = MockUserRepository::new();
            repo.expect_find_by_email().times(0);
            let (server, _store) = test_server(repo);

            let response = server
                .post("/login")
                .form(&login_form(email, "secret"))
                .await;

            response.assert_status_ok();
            let html = response.text();
            assert!(html.contains("Invalid email format."), "{email}");
            assert!(!html.contains(email), "{email} must be escaped on render");
        }
    }

    #[tokio::test]
    async fn test_dotless_domain_fails_format_check() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(0);
        let (server, _store) = test_server(repo);

        let response = server
            .post("/login")
            .form(&login_form("a@b", "secret"))
            .await;

        assert!(response.text().contains("Invalid email format."));
    }
}
