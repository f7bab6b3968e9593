//! Unified error handling for HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use print_router_core::StaffUserId;

use crate::db::RepositoryError;
use crate::services::EngineError;

/// Application-level error type for the router API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request conflicts with current state (duplicate, stale or illegal move).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(what) => Self::NotFound(what),
            EngineError::Forbidden(reason) => Self::Forbidden(reason),
            EngineError::Store(e) => Self::Database(e),
            e @ (EngineError::DuplicateAssignment(_)
            | EngineError::InvalidTransition(_)
            | EngineError::StaleStatus { .. }) => Self::Conflict(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Router request error"
            );
        }

        let status = match &self {
            Self::Database(RepositoryError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        };

        // Storage details stay in the logs
        let message = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Set the Sentry user context from the session's staff member.
pub fn set_sentry_user(staff_id: StaffUserId, name: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(staff_id.to_string()),
            username: Some(name.to_string()),
            ..Default::default()
        }));
    });
}
