#![allow(dead_code)]

use axum_test::TestServer;
use sqlx::PgPool;
use std::sync::Arc;
use student_login::infrastructure::persistence::PgUserRepository;
use student_login::infrastructure::session::MemorySessionStore;
use student_login::state::AppState;
use student_login::utils::password::hash_password;
use student_login::web::session::SessionCookie;

pub async fn create_student(pool: &PgPool, name: &str, email: &str, password: &str) -> i64 {
    let hash = hash_password(password).unwrap();

    sqlx::query_scalar("INSERT INTO student (name, email, password) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(email)
        .bind(hash)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(
        Arc::new(PgUserRepository::new(Arc::new(pool))),
        Arc::new(MemorySessionStore::default()),
        SessionCookie::default(),
    )
}

/// Browser routes against a real database. Rate limiting needs the peer
/// address, which the in-process transport lacks, so it is left out.
pub fn create_test_server(pool: PgPool) -> TestServer {
    let state = create_test_state(pool);
    let router = student_login::web::routes::routes(&state, false).with_state(state);

    TestServer::new(router).unwrap()
}

pub fn session_token(response: &axum_test::TestResponse) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let value = cookie.split(';').next()?.strip_prefix("login_session=")?;
            (!value.is_empty()).then(|| value.to_string())
        })
}
