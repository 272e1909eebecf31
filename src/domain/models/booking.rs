use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    General,
    Vip,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::General => "general",
            TicketType::Vip => "vip",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "general" => Some(TicketType::General),
            "vip" => Some(TicketType::Vip),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub event_id: String,
    pub attendee_name: String,
    pub ticket_type: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        event_id: String,
        attendee_name: String,
        ticket_type: TicketType,
        quantity: i32,
        notes: Option<String>,
        booked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            attendee_name,
            ticket_type: ticket_type.as_str().to_string(),
            quantity,
            notes,
            booked_at,
        }
    }

    pub fn ticket_type(&self) -> Option<TicketType> {
        TicketType::parse(&self.ticket_type)
    }
}
