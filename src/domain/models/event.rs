use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const CATEGORIES: &[&str] = &["Music", "Tech", "Education", "Sports", "Business", "Art"];

/// Moderation status of an event. Every content edit drops the event back
/// to `Pending` for re-verification; only `Approved` events sell seats.
///
/// Stored as plain TEXT on both backends; repositories bind `as_str()` and
/// rows decode through `TryFrom<String>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Expired,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown event status: {0}")]
pub struct ParseEventStatusError(String);

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Expired => "expired",
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = ParseEventStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EventStatus::Pending),
            "approved" => Ok(EventStatus::Approved),
            "rejected" => Ok(EventStatus::Rejected),
            "cancelled" => Ok(EventStatus::Cancelled),
            "expired" => Ok(EventStatus::Expired),
            other => Err(ParseEventStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for EventStatus {
    type Error = ParseEventStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One entry of an event's schedule. Kept ordered by list position and
/// stored as JSON text on the event row, like ticket benefits.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AgendaItem {
    pub time: String,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
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
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    pub organizer_id: String,
    #[serde(skip_serializing, default)]
    pub agenda_json: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
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
    pub organizer_id: String,
    pub agenda: Vec<AgendaItem>,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            category: params.category,
            description: params.description,
            start_time: params.start_time,
            end_time: params.end_time,
            location: params.location,
            contact_name: params.contact_name,
            contact_email: params.contact_email,
            contact_phone: params.contact_phone,
            is_free: params.is_free,
            status: EventStatus::Pending,
            organizer_id: params.organizer_id,
            agenda_json: encode_agenda(&params.agenda),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_upcoming(&self) -> bool {
        self.start_time >= Utc::now()
    }

    pub fn is_owned_by(&self, actor_id: &str) -> bool {
        self.organizer_id == actor_id
    }

    pub fn agenda(&self) -> Vec<AgendaItem> {
        serde_json::from_str(&self.agenda_json).unwrap_or_default()
    }

    pub fn set_agenda(&mut self, items: &[AgendaItem]) {
        self.agenda_json = encode_agenda(items);
    }
}

fn encode_agenda(items: &[AgendaItem]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".into())
}
