use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::EventPayload;
use crate::api::dtos::responses::EventDetailResponse;
use crate::api::extractors::actor::AuthActor;
use crate::domain::models::event::{Event, EventStatus, NewEventParams, CATEGORIES};
use crate::domain::models::ticket::Ticket;
use crate::domain::services::moderation;
use crate::domain::services::permissions::{is_allowed, Action};
use crate::error::{AppError, ValidationErrors};
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

fn validate_payload(payload: &EventPayload) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    if payload.title.trim().len() < 3 {
        errors.push("title", "Must be at least 3 characters");
    }
    if !CATEGORIES.contains(&payload.category.as_str()) {
        errors.push("category", "Unknown category");
    }
    if payload.start_time >= payload.end_time {
        errors.push("end_time", "Must be after start_time");
    }
    if payload.location.trim().is_empty() {
        errors.push("location", "This field is required");
    }
    if let Some(email) = &payload.contact_email
        && !email.contains('@')
    {
        errors.push("contact_email", "Enter a valid email address");
    }
    if !payload.is_free && payload.tickets.is_empty() {
        errors.push("tickets", "Paid events require at least one ticket type");
    }
    for item in &payload.agenda {
        if item.time.trim().is_empty() {
            errors.push("agenda", "Agenda item time is required");
        }
        if item.title.trim().is_empty() {
            errors.push("agenda", "Agenda item title is required");
        }
    }
    for ticket in &payload.tickets {
        if ticket.name.trim().is_empty() {
            errors.push("tickets", "Ticket name is required");
        }
        if ticket.price_cents < 0 {
            errors.push("tickets", "Ticket price must not be negative");
        }
        if ticket.total_seats < 1 {
            errors.push("tickets", "Ticket capacity must be positive");
        }
    }

    errors.into_result()
}

fn build_tickets(event_id: &str, payload: &EventPayload) -> Vec<Ticket> {
    payload
        .tickets
        .iter()
        .map(|t| {
            Ticket::new(
                event_id.to_string(),
                t.name.clone(),
                t.price_cents,
                t.total_seats,
                t.benefits.clone(),
            )
        })
        .collect()
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !is_allowed(actor.role, Action::CreateEvent) {
        return Err(AppError::Forbidden("Not allowed to create events".into()));
    }
    validate_payload(&payload)?;

    let event = Event::new(NewEventParams {
        title: payload.title.clone(),
        category: payload.category.clone(),
        description: payload.description.clone(),
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location.clone(),
        contact_name: payload.contact_name.clone(),
        contact_email: payload.contact_email.clone(),
        contact_phone: payload.contact_phone.clone(),
        is_free: payload.is_free,
        organizer_id: actor.id.clone(),
        agenda: payload.agenda.clone(),
    });
    let tickets = build_tickets(&event.id, &payload);

    info!("Creating event '{}' for organizer {}", event.title, actor.id);
    let created = state.event_repo.create(&event, &tickets).await?;

    Ok((
        StatusCode::CREATED,
        Json(EventDetailResponse::new(created, &tickets)),
    ))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_by_status(EventStatus::Approved).await?;
    Ok(Json(events))
}

pub async fn list_my_events(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_by_organizer(&actor.id).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_id(&id)
        .await?
        .filter(|e| !e.is_deleted)
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let tickets = state.ticket_repo.list_by_event(&event.id).await?;
    Ok(Json(EventDetailResponse::new(event, &tickets)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !is_allowed(actor.role, Action::EditEvent) {
        return Err(AppError::Forbidden("Not allowed to edit events".into()));
    }
    validate_payload(&payload)?;

    let mut event = state
        .event_repo
        .find_by_id(&id)
        .await?
        .filter(|e| !e.is_deleted)
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !event.is_owned_by(&actor.id) {
        return Err(AppError::Forbidden("Only the organizer can edit this event".into()));
    }

    event.title = payload.title.clone();
    event.category = payload.category.clone();
    event.description = payload.description.clone();
    event.start_time = payload.start_time;
    event.end_time = payload.end_time;
    event.location = payload.location.clone();
    event.contact_name = payload.contact_name.clone();
    event.contact_email = payload.contact_email.clone();
    event.contact_phone = payload.contact_phone.clone();
    event.is_free = payload.is_free;
    event.set_agenda(&payload.agenda);
    // Every content edit goes back through moderation.
    event.status = moderation::status_after_edit();

    let tickets = build_tickets(&event.id, &payload);

    info!("Updating event {} (status reset to pending)", event.id);
    let updated = state.event_repo.update(&event, &tickets).await?;

    Ok(Json(EventDetailResponse::new(updated, &tickets)))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_allowed(actor.role, Action::DeleteEvent) {
        return Err(AppError::Forbidden("Not allowed to delete events".into()));
    }

    let event = state
        .event_repo
        .find_by_id(&id)
        .await?
        .filter(|e| !e.is_deleted)
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !actor.is_admin() && !event.is_owned_by(&actor.id) {
        return Err(AppError::Forbidden("Only the organizer can delete this event".into()));
    }

    state.event_repo.soft_delete(&event.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
