use serde::Serialize;
use crate::domain::models::event::Event;
use crate::domain::services::availability::Availability;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingLinkResponse {
    pub event_id: String,
    pub title: String,
    pub sharing_link: String,
}

/// Event as listed on the attendee home page.
#[derive(Serialize)]
pub struct EventCard {
    pub event: Event,
    pub formatted_date: String,
    pub formatted_time: String,
    pub availability: Availability,
}

/// Event row on the organizer dashboard.
#[derive(Serialize)]
pub struct EventRow {
    pub event: Event,
    pub formatted_date: String,
    pub formatted_created_at: String,
    pub formatted_published_at: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
