//! Authentication extractors.
//!
//! The identity service writes a [`CurrentStaff`] into the shared session.
//! These extractors read it back and reject with 401 (no identity) or 403
//! (wrong role). Per-assignment authorization happens in the lifecycle
//! service, which checks center membership against the store.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use print_router_core::StaffRole;

use crate::error::set_sentry_user;
use crate::models::{CurrentStaff, session_keys};

/// Extractor that requires any signed-in staff member.
///
/// ```rust,ignore
/// async fn handler(RequireStaff(staff): RequireStaff) -> impl IntoResponse {
///     format!("Hello, {}!", staff.name)
/// }
/// ```
pub struct RequireStaff(pub CurrentStaff);

/// Extractor that requires a signed-in operator.
pub struct RequireOperator(pub CurrentStaff);

/// Error returned when the session does not grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No staff identity in the session.
    Unauthorized,
    /// Signed in, but without the required role.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Sign in required").into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Only operators can access this resource",
            )
                .into_response(),
        }
    }
}

async fn current_staff(parts: &Parts) -> Result<CurrentStaff, AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::Unauthorized)?;

    let staff: CurrentStaff = session
        .get(session_keys::CURRENT_STAFF)
        .await
        .ok()
        .flatten()
        .ok_or(AuthRejection::Unauthorized)?;

    set_sentry_user(staff.id, &staff.name);
    Ok(staff)
}

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_staff(parts).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for RequireOperator
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let staff = current_staff(parts).await?;
        if staff.role != StaffRole::Operator {
            tracing::info!(staff_id = %staff.id, role = %staff.role, "Operator route refused");
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(staff))
    }
}

/// Store the signed-in staff member in the session.
///
/// The identity service normally does this; the router uses it in tests
/// and local tooling.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_staff(
    session: &Session,
    staff: &CurrentStaff,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_STAFF, staff).await
}
