use crate::domain::models::{
    event::{Event, EventStatus},
    registration::{EventStats, Registration},
    ticket::Ticket,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the event and its ticket types in one transaction.
    async fn create(&self, event: &Event, tickets: &[Ticket]) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, AppError>;
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError>;
    /// Rewrites the event content, soft-retires the old ticket set and
    /// inserts the replacement set, all in one transaction.
    async fn update(&self, event: &Event, tickets: &[Ticket]) -> Result<Event, AppError>;
    async fn set_status(&self, id: &str, status: EventStatus) -> Result<Event, AppError>;
    async fn soft_delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Ticket>, AppError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Atomic reserve-and-record: bumps the ticket's booked counter only if
    /// capacity allows and inserts the registration row in the same
    /// transaction. Fails with `CapacityExceeded` without touching either.
    async fn reserve(&self, registration: &Registration) -> Result<Registration, AppError>;
    /// Flips a confirmed registration to cancelled and releases its seats
    /// back to the ticket counter, atomically.
    async fn cancel(&self, id: &str) -> Result<Registration, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Registration>, AppError>;
    async fn stats_by_event(&self, event_id: &str) -> Result<EventStats, AppError>;
    /// Rewrites every ticket's booked counter from the confirmed rows and
    /// returns how many tickets had drifted. Maintenance operation.
    async fn reconcile_counters(&self) -> Result<u64, AppError>;
}
