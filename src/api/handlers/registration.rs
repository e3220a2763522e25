use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::RegisterRequest;
use crate::api::extractors::actor::AuthActor;
use crate::domain::services::inventory::RegisterInput;
use crate::domain::services::permissions::{is_allowed, Action};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn register(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<String>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !is_allowed(actor.role, Action::Register) {
        return Err(AppError::Forbidden("Not allowed to register".into()));
    }

    let registration = state
        .inventory
        .register(
            &actor,
            &event_id,
            RegisterInput {
                ticket_id: payload.ticket_id,
                quantity: payload.quantity,
                full_name: payload.full_name,
                email: payload.email,
                phone: payload.phone,
                special_requests: payload.special_requests,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(registration)))
}

pub async fn cancel_registration(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_allowed(actor.role, Action::CancelRegistration) {
        return Err(AppError::Forbidden("Not allowed to cancel registrations".into()));
    }

    let cancelled = state.inventory.cancel(&actor, &id).await?;
    Ok(Json(cancelled))
}

pub async fn list_event_registrations(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_id(&event_id)
        .await?
        .filter(|e| !e.is_deleted)
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !actor.is_admin() && !event.is_owned_by(&actor.id) {
        return Err(AppError::Forbidden("Only the organizer can view registrations".into()));
    }

    let registrations = state.registration_repo.list_by_event(&event.id).await?;
    Ok(Json(registrations))
}

pub async fn list_my_registrations(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Result<impl IntoResponse, AppError> {
    let registrations = state.registration_repo.list_by_user(&actor.id).await?;
    Ok(Json(registrations))
}

/// Live aggregate over the event's registration rows; never served from
/// the denormalized counters.
pub async fn event_stats(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_allowed(actor.role, Action::ViewEventStats) {
        return Err(AppError::Forbidden("Not allowed to view stats".into()));
    }

    let event = state
        .event_repo
        .find_by_id(&event_id)
        .await?
        .filter(|e| !e.is_deleted)
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !actor.is_admin() && !event.is_owned_by(&actor.id) {
        return Err(AppError::Forbidden("Only the organizer can view stats".into()));
    }

    let stats = state.registration_repo.stats_by_event(&event.id).await?;
    Ok(Json(stats))
}
