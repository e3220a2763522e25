use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use crate::api::dtos::responses::ReconcileResponse;
use crate::api::extractors::actor::AuthActor;
use crate::domain::models::actor::Actor;
use crate::domain::models::event::EventStatus;
use crate::domain::services::moderation::{self, ModerationOutcome};
use crate::domain::services::permissions::{is_allowed, Action};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn list_pending_events(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Result<impl IntoResponse, AppError> {
    if !is_allowed(actor.role, Action::ViewModerationQueue) {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    let events = state.event_repo.list_by_status(EventStatus::Pending).await?;
    Ok(Json(events))
}

async fn decide(
    state: Arc<AppState>,
    actor: Actor,
    event_id: String,
    target: EventStatus,
) -> Result<impl IntoResponse, AppError> {
    if !is_allowed(actor.role, Action::ModerateEvent) {
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    let event = state
        .event_repo
        .find_by_id(&event_id)
        .await?
        .filter(|e| !e.is_deleted)
        .ok_or(AppError::NotFound("Event not found".into()))?;

    match moderation::moderate(event.status, target)? {
        ModerationOutcome::Apply => {
            info!("Event {} moderated to {}", event.id, target.as_str());
            let updated = state.event_repo.set_status(&event.id, target).await?;
            Ok(Json(updated))
        }
        ModerationOutcome::Noop => Ok(Json(event)),
    }
}

pub async fn approve_event(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    decide(state, actor, id, EventStatus::Approved).await
}

pub async fn reject_event(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    decide(state, actor, id, EventStatus::Rejected).await
}

/// Rewrites every booked-seat counter from the confirmed registration rows.
/// Counters and rows should never diverge; a non-zero drift count here
/// points at a write path bypassing the inventory service.
pub async fn reconcile_counters(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Result<impl IntoResponse, AppError> {
    if !is_allowed(actor.role, Action::ReconcileCounters) {
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    let drifted = state.registration_repo.reconcile_counters().await?;
    if drifted > 0 {
        warn!("Reconciliation corrected {} drifted ticket counter(s)", drifted);
    }
    Ok(Json(ReconcileResponse { drifted_tickets: drifted }))
}
