//! Print Router - fulfillment engine and HTTP service.
//!
//! Routes paid orders to print centers, tracks each assignment through
//! `PENDING -> PRINTING -> READY -> DELIVERED` (or `CANCELLED`), and exposes a
//! minimal public tracking view.
//!
//! # Architecture
//!
//! - [`services`] - the engine, written against [`db::FulfillmentStore`]
//! - [`db`] - `PostgreSQL` store and an in-memory store for tests
//! - [`routes`] - Axum handlers; staff identity comes from shared sessions
//!
//! The binary in `main.rs` wires configuration, Sentry and tracing around
//! [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// The full application: every route plus the middleware stack.
pub fn app<Store>(state: AppState, sessions: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    with_layers(routes::routes(), state, sessions)
}

/// Wrap `routes` in the middleware stack and attach state.
pub fn with_layers<Store>(
    routes: Router<AppState>,
    state: AppState,
    sessions: SessionManagerLayer<Store>,
) -> Router
where
    Store: SessionStore + Clone,
{
    routes
        .layer(sessions)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Json,
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
        routing::post,
    };
    use secrecy::SecretString;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore as SessionMemoryStore, Session};

    use print_router_core::{AssignmentStatus, StaffRole, StaffUserId};

    use super::*;
    use crate::config::ServerConfig;
    use crate::db::memory::tests::paid_order;
    use crate::db::{FulfillmentStore, MemoryStore};
    use crate::middleware::{session_layer, set_current_staff};
    use crate::models::CurrentStaff;

    const OPERATOR: StaffUserId = StaffUserId::new(1);
    const CENTER_STAFF: StaffUserId = StaffUserId::new(2);

    /// Stands in for the identity service: writes the posted identity into the session.
    async fn login(session: Session, Json(staff): Json<CurrentStaff>) -> StatusCode {
        set_current_staff(&session, &staff).await.unwrap();
        StatusCode::NO_CONTENT
    }

    fn test_app(store: Arc<MemoryStore>) -> Router {
        let config = ServerConfig::with_database_url(SecretString::from("postgres://unused"));
        let sessions = session_layer(SessionMemoryStore::default(), &config);
        let state = AppState::new(config, store);
        with_layers(
            routes::routes().route("/test/login", post(login)),
            state,
            sessions,
        )
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Sign in and return the session cookie.
    async fn sign_in(app: &Router, id: StaffUserId, role: StaffRole) -> String {
        let staff = CurrentStaff {
            id,
            name: "Test Staff".to_string(),
            role,
        };
        let response = send(
            app,
            Request::post("/test/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&staff).unwrap()))
                .unwrap(),
        )
        .await;
        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        cookie.to_str().unwrap().split(';').next().unwrap().to_string()
    }

    fn post_json(uri: &str, cookie: &str, body: &serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(Arc::new(MemoryStore::new()));
        let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_readiness_reports_store_outage() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app(store.clone());
        let ready = || Request::get("/health/ready").body(Body::empty()).unwrap();

        assert_eq!(send(&app, ready()).await.status(), StatusCode::OK);
        store.set_unavailable(true).unwrap();
        assert_eq!(
            send(&app, ready()).await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_tracking_unknown_order_is_404() {
        let app = test_app(Arc::new(MemoryStore::new()));
        let response = send(&app, Request::get("/track/77").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tracking_malformed_order_id_is_404() {
        let app = test_app(Arc::new(MemoryStore::new()));
        for uri in ["/track/abc", "/track/-", "/track/99999999999"] {
            let response = send(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_tracking_returns_only_public_fields() {
        let store = Arc::new(MemoryStore::new());
        let center = store.insert_print_center("Dokki", true).unwrap();
        let order = store.insert_order(paid_order(None, None)).unwrap();
        store.insert_assignment(order.id, center.id).await.unwrap();
        let app = test_app(store);

        let response = send(
            &app,
            Request::get(format!("/track/{}", order.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "status": "PENDING", "printCenter": { "name": "Dokki" } })
        );
    }

    #[tokio::test]
    async fn test_admin_routes_require_session() {
        let app = test_app(Arc::new(MemoryStore::new()));
        let response = send(
            &app,
            Request::post("/admin/assignments/run")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_reject_center_staff() {
        let app = test_app(Arc::new(MemoryStore::new()));
        let cookie = sign_in(&app, CENTER_STAFF, StaffRole::CenterStaff).await;
        let response = send(
            &app,
            Request::get("/admin/centers")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_operator_runs_assignment_and_staff_advances_it() {
        let store = Arc::new(MemoryStore::new());
        let center = store.insert_print_center("Maadi", true).unwrap();
        store.add_staff(CENTER_STAFF, center.id).unwrap();
        store.insert_order(paid_order(None, None)).unwrap();
        let app = test_app(store.clone());

        let operator = sign_in(&app, OPERATOR, StaffRole::Operator).await;
        let response = send(
            &app,
            post_json("/admin/assignments/run", &operator, &serde_json::json!({})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["created"].as_array().unwrap().len(), 1);
        let assignment_id = report["created"][0]["id"].as_i64().unwrap();

        let staff = sign_in(&app, CENTER_STAFF, StaffRole::CenterStaff).await;
        let uri = format!("/assignments/{assignment_id}/status");

        let skipped = send(
            &app,
            post_json(&uri, &staff, &serde_json::json!({ "status": "DELIVERED" })),
        )
        .await;
        assert_eq!(skipped.status(), StatusCode::CONFLICT);

        let advanced = send(
            &app,
            post_json(
                &uri,
                &staff,
                &serde_json::json!({ "status": "PRINTING", "expected": "PENDING" }),
            ),
        )
        .await;
        assert_eq!(advanced.status(), StatusCode::OK);
        assert_eq!(body_json(advanced).await["status"], "PRINTING");
        assert!(
            store
                .all_assignments()
                .unwrap()
                .iter()
                .all(|a| a.status == AssignmentStatus::Printing)
        );
    }

    #[tokio::test]
    async fn test_operator_without_membership_cannot_transition() {
        let store = Arc::new(MemoryStore::new());
        let center = store.insert_print_center("Maadi", true).unwrap();
        let order = store.insert_order(paid_order(None, None)).unwrap();
        let assignment = store.insert_assignment(order.id, center.id).await.unwrap();
        let app = test_app(store);

        let operator = sign_in(&app, OPERATOR, StaffRole::Operator).await;
        let response = send(
            &app,
            post_json(
                &format!("/assignments/{}/status", assignment.id),
                &operator,
                &serde_json::json!({ "status": "PRINTING" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_reassign_reports_count() {
        let store = Arc::new(MemoryStore::new());
        let a = store.insert_print_center("A", true).unwrap();
        let b = store.insert_print_center("B", true).unwrap();
        for _ in 0..2 {
            let order = store.insert_order(paid_order(None, None)).unwrap();
            store.insert_assignment(order.id, a.id).await.unwrap();
        }
        let app = test_app(store);

        let operator = sign_in(&app, OPERATOR, StaffRole::Operator).await;
        let response = send(
            &app,
            post_json(
                "/admin/assignments/reassign",
                &operator,
                &serde_json::json!({ "print_center_id": b.id }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["updated"], 2);
    }
}
