use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stored as plain TEXT on both backends; repositories bind `as_str()` and
/// rows decode through `TryFrom<String>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown registration status: {0}")]
pub struct ParseRegistrationStatusError(String);

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for RegistrationStatus {
    type Err = ParseRegistrationStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(RegistrationStatus::Confirmed),
            "cancelled" => Ok(RegistrationStatus::Cancelled),
            other => Err(ParseRegistrationStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for RegistrationStatus {
    type Error = ParseRegistrationStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A buyer's claim on `quantity` seats of one ticket type. Created only by
/// the inventory service; the only later transition is confirmed -> cancelled.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub ticket_id: String,
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub quantity: i64,
    pub total_amount_cents: i64,
    pub special_requests: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: RegistrationStatus,
    pub transaction_ref: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewRegistrationParams {
    pub event_id: String,
    pub ticket_id: String,
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub quantity: i64,
    pub total_amount_cents: i64,
    pub special_requests: Option<String>,
}

impl Registration {
    /// The amount is computed by the inventory service from the ticket
    /// price; client supplied totals are never accepted.
    pub fn new(params: NewRegistrationParams) -> Self {
        let transaction_ref: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_id: params.event_id,
            ticket_id: params.ticket_id,
            user_id: params.user_id,
            full_name: params.full_name,
            email: params.email,
            phone: params.phone,
            quantity: params.quantity,
            total_amount_cents: params.total_amount_cents,
            special_requests: params.special_requests,
            status: RegistrationStatus::Confirmed,
            transaction_ref,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Registration/revenue summary for one event, computed from the
/// registration rows at call time.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default)]
pub struct EventStats {
    pub total_registrations: i64,
    pub confirmed_registrations: i64,
    pub pending_registrations: i64,
    pub cancelled_registrations: i64,
    pub total_tickets_sold: i64,
    pub total_revenue_cents: i64,
}
