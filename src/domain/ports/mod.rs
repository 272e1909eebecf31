use crate::domain::models::{
    booking::Booking,
    event::{Event, EventDetails, EventStats},
    session::Session,
    settings::{SettingsUpdate, SiteSettings},
    user::User,
};
use crate::domain::services::availability::BookedTotals;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_published(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Published events, earliest date first.
    async fn list_published(&self) -> Result<Vec<Event>, AppError>;
    /// Drafts, most recently created first.
    async fn list_drafts(&self) -> Result<Vec<Event>, AppError>;
    async fn update_details(&self, id: &str, details: &EventDetails) -> Result<Event, AppError>;
    /// Returns `false` when no draft with that id existed.
    async fn publish(&self, id: &str, published_at: DateTime<Utc>) -> Result<bool, AppError>;
    /// Removes the event's bookings, then the event.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn stats(&self) -> Result<EventStats, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn booked_totals(&self, event_id: &str) -> Result<BookedTotals, AppError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// The row with the highest id, if any.
    async fn current(&self) -> Result<Option<SiteSettings>, AppError>;
    /// Updates the current row, or inserts the first one.
    async fn save(&self, update: &SettingsUpdate) -> Result<SiteSettings, AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<Session, AppError>;
    async fn find(&self, token_hash: &str) -> Result<Option<Session>, AppError>;
    async fn set_return_to(&self, token_hash: &str, return_to: Option<&str>) -> Result<(), AppError>;
    async fn delete(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}
