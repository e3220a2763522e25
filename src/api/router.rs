use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{admin, event, health, registration};
use crate::state::AppState;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route("/api/v1/events/my", get(event::list_my_events))
        .route("/api/v1/events/pending", get(admin::list_pending_events))
        .route(
            "/api/v1/events/{id}",
            get(event::get_event).put(event::update_event).delete(event::delete_event),
        )

        // Moderation
        .route("/api/v1/events/{id}/approve", post(admin::approve_event))
        .route("/api/v1/events/{id}/reject", post(admin::reject_event))

        // Registration flow
        .route("/api/v1/events/{id}/register", post(registration::register))
        .route("/api/v1/events/{id}/registrations", get(registration::list_event_registrations))
        .route("/api/v1/events/{id}/stats", get(registration::event_stats))
        .route("/api/v1/registrations/my", get(registration::list_my_registrations))
        .route("/api/v1/registrations/{id}/cancel", post(registration::cancel_registration))

        // Maintenance
        .route("/api/v1/admin/reconcile", post(admin::reconcile_counters))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                }),
        )
        .with_state(state)
}
