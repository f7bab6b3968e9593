//! Session middleware configuration.
//!
//! Sessions are created by the external identity service and shared through
//! the `session` table; this layer only loads them.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ServerConfig;

/// Session cookie name shared with the identity service.
pub const SESSION_COOKIE_NAME: &str = "print_router_session";

/// Session expiry time in seconds (12 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 12 * 60 * 60;

/// The session store could not be configured.
#[derive(Debug, Error)]
#[error("invalid session store setting: {0}")]
pub struct SessionStoreError(String);

/// Create the session layer with the `PostgreSQL` store.
///
/// # Errors
///
/// Returns `SessionStoreError` if the schema or table name is rejected.
pub fn create_session_layer(
    pool: &PgPool,
    config: &ServerConfig,
) -> Result<SessionManagerLayer<PostgresStore>, SessionStoreError> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("public")
        .map_err(SessionStoreError)?
        .with_table_name("session")
        .map_err(SessionStoreError)?;

    Ok(session_layer(store, config))
}

/// Apply the cookie settings to any session store.
#[must_use]
pub fn session_layer<S>(store: S, config: &ServerConfig) -> SessionManagerLayer<S>
where
    S: tower_sessions::SessionStore + Clone,
{
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
