use crate::domain::models::actor::Actor;
use crate::domain::models::registration::{NewRegistrationParams, Registration, RegistrationStatus};
use crate::domain::ports::{EventRepository, RegistrationRepository, TicketRepository};
use crate::domain::services::moderation;
use crate::error::{AppError, ValidationErrors};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Attempts per reservation when the storage layer reports transient
/// contention (lock wait, serialization failure). A genuine sell-out is
/// surfaced immediately, never retried.
const MAX_RESERVE_ATTEMPTS: u32 = 5;

pub struct RegisterInput {
    pub ticket_id: String,
    pub quantity: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: Option<String>,
}

/// The single write path for registrations and seat counters. Capacity
/// validation and the counter increment happen inside one storage
/// transaction; nothing else in the service writes `booked_seats`.
pub struct InventoryService {
    events: Arc<dyn EventRepository>,
    tickets: Arc<dyn TicketRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl InventoryService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        tickets: Arc<dyn TicketRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self { events, tickets, registrations }
    }

    pub async fn register(
        &self,
        actor: &Actor,
        event_id: &str,
        input: RegisterInput,
    ) -> Result<Registration, AppError> {
        validate_buyer_input(&input)?;

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .filter(|e| !e.is_deleted)
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if !moderation::accepts_registrations(event.status) {
            return Err(AppError::Conflict(
                "Event is not accepting registrations".into(),
            ));
        }

        let ticket = self
            .tickets
            .find_by_id(&input.ticket_id)
            .await?
            .filter(|t| !t.is_deleted && t.event_id == event.id)
            .ok_or(AppError::NotFound("Ticket not found for this event".into()))?;

        // Overflow on price * quantity is a nonsensical request, not a 500.
        let total_amount_cents = ticket
            .price_cents
            .checked_mul(input.quantity)
            .ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.push("quantity", "Too many seats requested");
                AppError::Invalid(errors)
            })?;

        let registration = Registration::new(NewRegistrationParams {
            event_id: event.id.clone(),
            ticket_id: ticket.id.clone(),
            user_id: actor.id.clone(),
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            quantity: input.quantity,
            total_amount_cents,
            special_requests: input.special_requests,
        });

        let mut attempt = 1;
        loop {
            match self.registrations.reserve(&registration).await {
                Err(AppError::Database(e))
                    if AppError::is_transient_contention(&e) && attempt < MAX_RESERVE_ATTEMPTS =>
                {
                    warn!(
                        "Reservation contention for ticket {} (attempt {}), retrying",
                        ticket.id, attempt
                    );
                    tokio::time::sleep(Duration::from_millis(10 * attempt as u64)).await;
                    attempt += 1;
                }
                Ok(created) => {
                    info!(
                        "Reserved {} seat(s) of ticket {} for user {} (txn {})",
                        created.quantity, created.ticket_id, created.user_id, created.transaction_ref
                    );
                    return Ok(created);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Cancels a confirmed registration and releases its seats. Buyers may
    /// cancel their own rows; admins may cancel any.
    pub async fn cancel(&self, actor: &Actor, registration_id: &str) -> Result<Registration, AppError> {
        let registration = self
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(AppError::NotFound("Registration not found".into()))?;

        if !actor.is_admin() && registration.user_id != actor.id {
            return Err(AppError::Forbidden("Not your registration".into()));
        }

        if registration.status == RegistrationStatus::Cancelled {
            return Err(AppError::Conflict("Registration is already cancelled".into()));
        }

        let cancelled = self.registrations.cancel(registration_id).await?;
        info!(
            "Released {} seat(s) of ticket {} (registration {})",
            cancelled.quantity, cancelled.ticket_id, cancelled.id
        );
        Ok(cancelled)
    }
}

fn validate_buyer_input(input: &RegisterInput) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    if input.quantity < 1 {
        errors.push("quantity", "Must request at least one seat");
    }
    if input.full_name.trim().is_empty() {
        errors.push("full_name", "This field is required");
    }
    if !input.email.contains('@') {
        errors.push("email", "Enter a valid email address");
    }
    if input.phone.trim().is_empty() {
        errors.push("phone", "This field is required");
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(quantity: i64) -> RegisterInput {
        RegisterInput {
            ticket_id: "t1".into(),
            quantity,
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "+4912345".into(),
            special_requests: None,
        }
    }

    #[test]
    fn rejects_non_positive_quantity() {
        assert!(validate_buyer_input(&input(0)).is_err());
        assert!(validate_buyer_input(&input(-3)).is_err());
        assert!(validate_buyer_input(&input(1)).is_ok());
    }

    #[test]
    fn rejects_malformed_contact_info() {
        let mut bad = input(1);
        bad.email = "not-an-email".into();
        bad.full_name = "  ".into();
        let err = validate_buyer_input(&bad).unwrap_err();
        match err {
            AppError::Invalid(fields) => {
                assert!(fields.0.contains_key("email"));
                assert!(fields.0.contains_key("full_name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
