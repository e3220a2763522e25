use crate::domain::models::event::AgendaItem;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct TicketInput {
    pub name: String,
    pub price_cents: i64,
    pub total_seats: i64,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// Full event content. Used for both create and update: an edit always
/// rewrites the whole event and replaces its ticket set and agenda.
#[derive(Deserialize)]
pub struct EventPayload {
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_free: bool,
    #[serde(default)]
    pub agenda: Vec<AgendaItem>,
    #[serde(default)]
    pub tickets: Vec<TicketInput>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub ticket_id: String,
    pub quantity: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: Option<String>,
}
