//! HTTP middleware for the router.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (reuse upstream header or generate a UUID)
//! 4. Session layer (tower-sessions, `PostgreSQL` store in production)
//!
//! Authentication is done per handler through the [`auth`] extractors.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{AuthRejection, RequireOperator, RequireStaff, set_current_staff};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, SessionStoreError, create_session_layer, session_layer};
