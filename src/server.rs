//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, session store setup, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::repositories::UserRepository;
use crate::infrastructure::persistence::PgUserRepository;
use crate::infrastructure::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::web::session::SessionCookie;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis session store (or in-memory fallback)
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let sessions = build_session_store(&config).await;
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(Arc::new(pool)));

    let session_cookie = SessionCookie {
        secure: config.session_cookie_secure,
        max_age_seconds: config.session_ttl_seconds,
    };
    let state = AppState::new(users, sessions, session_cookie);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects to Redis when configured, falling back to process-local sessions.
async fn build_session_store(config: &Config) -> Arc<dyn SessionStore> {
    let ttl = config.session_ttl_seconds;

    if let Some(redis_url) = &config.redis_url {
        match RedisSessionStore::connect(redis_url, ttl, config.session_secret.as_bytes()).await {
            Ok(redis) => {
                tracing::info!("Sessions stored in Redis");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Using in-memory sessions.",
                    e
                );
            }
        }
    } else {
        tracing::info!("Redis not configured, using in-memory sessions");
    }

    Arc::new(MemorySessionStore::new(Duration::from_secs(ttl)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
