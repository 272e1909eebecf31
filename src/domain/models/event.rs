use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Draft,
    Published,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "draft" => Some(EventStatus::Draft),
            "published" => Some(EventStatus::Published),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: String,
    pub tickets_general: i32,
    pub tickets_vip: i32,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Fresh draft scheduled one week out, as produced by "create event".
    pub fn new_draft(tickets_general: i32, tickets_vip: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: "New Event".to_string(),
            description: "Event description".to_string(),
            date: now + Duration::days(7),
            status: EventStatus::Draft.as_str().to_string(),
            tickets_general: tickets_general.max(0),
            tickets_vip: tickets_vip.max(0),
            created_at: now,
            published_at: None,
        }
    }

    pub fn status(&self) -> Option<EventStatus> {
        EventStatus::parse(&self.status)
    }
}

/// Editable fields of an event, as submitted by the organizer form.
#[derive(Debug, Clone)]
pub struct EventDetails {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub tickets_general: i32,
    pub tickets_vip: i32,
}

#[derive(Debug, Serialize, Clone, Default, FromRow)]
pub struct EventStats {
    pub total_events: i64,
    pub published_events: i64,
    pub draft_events: i64,
    pub total_bookings: i64,
}
