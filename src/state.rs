use crate::config::Config;
use crate::domain::ports::{EventRepository, RegistrationRepository, TicketRepository};
use crate::domain::services::inventory::InventoryService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub inventory: Arc<InventoryService>,
}
