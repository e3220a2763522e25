use crate::domain::models::{
    event::{AgendaItem, Event},
    ticket::Ticket,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct TicketResponse {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub total_seats: i64,
    pub booked_seats: i64,
    pub remaining_seats: i64,
    pub is_available: bool,
    pub benefits: Vec<String>,
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.clone(),
            name: ticket.name.clone(),
            price_cents: ticket.price_cents,
            total_seats: ticket.total_seats,
            booked_seats: ticket.booked_seats,
            remaining_seats: ticket.remaining_seats(),
            is_available: ticket.is_available(),
            benefits: ticket.benefits(),
        }
    }
}

#[derive(Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: Event,
    pub is_upcoming: bool,
    pub agenda: Vec<AgendaItem>,
    pub tickets: Vec<TicketResponse>,
}

impl EventDetailResponse {
    pub fn new(event: Event, tickets: &[Ticket]) -> Self {
        Self {
            is_upcoming: event.is_upcoming(),
            agenda: event.agenda(),
            tickets: tickets.iter().map(TicketResponse::from).collect(),
            event,
        }
    }
}

#[derive(Serialize)]
pub struct ReconcileResponse {
    pub drifted_tickets: u64,
}
