use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A purchasable ticket type (price + seat pool), not an individual seat.
/// `booked_seats` is a denormalized counter over confirmed registrations;
/// it is written only by the registration repository's atomic reserve and
/// release operations.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Ticket {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub price_cents: i64,
    pub total_seats: i64,
    pub booked_seats: i64,
    pub benefits_json: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(
        event_id: String,
        name: String,
        price_cents: i64,
        total_seats: i64,
        benefits: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            name,
            price_cents,
            total_seats,
            booked_seats: 0,
            benefits_json: serde_json::to_string(&benefits).unwrap_or_else(|_| "[]".into()),
            is_deleted: false,
            created_at: Utc::now(),
        }
    }

    pub fn benefits(&self) -> Vec<String> {
        serde_json::from_str(&self.benefits_json).unwrap_or_default()
    }

    pub fn remaining_seats(&self) -> i64 {
        self.total_seats - self.booked_seats
    }

    pub fn is_available(&self) -> bool {
        self.booked_seats < self.total_seats
    }
}
