pub mod postgres_event_repo;
pub mod postgres_registration_repo;
pub mod postgres_ticket_repo;
pub mod sqlite_event_repo;
pub mod sqlite_registration_repo;
pub mod sqlite_ticket_repo;
