pub mod actor;
pub mod event;
pub mod registration;
pub mod ticket;
